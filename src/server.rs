// ABOUTME: Viewer server for the his-poster application
// ABOUTME: Serves the poster and the deck and runs exports on request, one request at a time

use crate::capture::CaptureConfig;
use crate::content::{Deck, Poster};
use crate::errors::{DeckError, Result};
use crate::export::{self, DECK_PDF_FILE, POSTER_FAILURE_MESSAGE, POSTER_PDF_FILE};
use crate::html;
use crate::navigation::Navigator;
use crate::pptx::{self, PptxConfig, PPTX_FILE};
use log::{debug, error, info, warn};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// URL paths understood by the viewer.
pub mod routes {
    pub const POSTER: &str = "/";
    pub const DECK: &str = "/presentation";
    pub const NEXT: &str = "/presentation/next";
    pub const PREVIOUS: &str = "/presentation/previous";
    pub const POSTER_PDF: &str = "/download/poster.pdf";
    pub const DECK_PDF: &str = "/download/presentation.pdf";
    pub const DECK_PPTX: &str = "/download/presentation.pptx";
}

/// Configuration for the viewer server
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub capture: CaptureConfig,
    pub pptx: PptxConfig,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            capture: CaptureConfig::default(),
            pptx: PptxConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Poster,
    Deck,
    Next,
    Previous,
    Jump(usize),
    PosterPdf,
    DeckPdf,
    DeckPptx,
    NotFound,
}

impl Route {
    /// Map a request path (query string allowed) to a route.
    pub fn parse(url: &str) -> Route {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match path {
            routes::POSTER => Route::Poster,
            routes::DECK => Route::Deck,
            routes::NEXT => Route::Next,
            routes::PREVIOUS => Route::Previous,
            routes::POSTER_PDF => Route::PosterPdf,
            routes::DECK_PDF => Route::DeckPdf,
            routes::DECK_PPTX => Route::DeckPptx,
            other => other
                .strip_prefix(routes::DECK)
                .and_then(|rest| rest.strip_prefix('/'))
                .and_then(|index| index.parse::<usize>().ok())
                .map(Route::Jump)
                .unwrap_or(Route::NotFound),
        }
    }
}

/// What the viewer answers with, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Html(String),
    Redirect(&'static str),
    Attachment {
        file_name: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    },
    NotFound,
    Failure(String),
}

/// The poster, the deck and the one navigation cursor they share.
pub struct Viewer {
    deck: Deck,
    poster: Poster,
    navigator: Navigator,
    config: ServeConfig,
}

impl Viewer {
    pub fn new(deck: Deck, poster: Poster, config: ServeConfig) -> Result<Self> {
        let navigator = Navigator::new(deck.len())?;
        Ok(Self {
            deck,
            poster,
            navigator,
            config,
        })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Handle one route. Export routes launch a headless browser.
    pub fn handle(&mut self, route: Route) -> Reply {
        match route {
            Route::Poster => self.page(html::generate_poster_html(&self.poster)),
            Route::Deck => self.page(html::generate_deck_html(&self.deck, &self.navigator)),
            Route::Next => {
                self.navigator.next();
                Reply::Redirect(routes::DECK)
            }
            Route::Previous => {
                self.navigator.previous();
                Reply::Redirect(routes::DECK)
            }
            Route::Jump(index) => match self.navigator.jump_to(index) {
                Ok(_) => Reply::Redirect(routes::DECK),
                Err(e) => {
                    debug!("Rejected jump: {}", e);
                    Reply::NotFound
                }
            },
            Route::PosterPdf => self.poster_pdf(),
            Route::DeckPdf => self.deck_pdf(),
            Route::DeckPptx => self.deck_pptx(),
            Route::NotFound => Reply::NotFound,
        }
    }

    fn page(&self, html: Result<String>) -> Reply {
        match html {
            Ok(html) => Reply::Html(html),
            Err(e) => {
                error!("Failed to render page: {}", e);
                Reply::Failure(e.to_string())
            }
        }
    }

    fn poster_pdf(&mut self) -> Reply {
        let rendered = export::render_poster_pdf(&self.poster, &self.config.capture)
            .and_then(|document| document.map(|document| document.finish()).transpose());
        match rendered {
            Ok(Some(data)) => Reply::Attachment {
                file_name: POSTER_PDF_FILE,
                content_type: "application/pdf",
                data,
            },
            Ok(None) => Reply::Redirect(routes::POSTER),
            Err(e) => {
                error!("Error generating PDF: {}", e);
                Reply::Failure(POSTER_FAILURE_MESSAGE.to_string())
            }
        }
    }

    fn deck_pdf(&mut self) -> Reply {
        let rendered =
            export::render_deck_pdf(&self.deck, &mut self.navigator, &self.config.capture)
                .and_then(|document| document.finish());
        match rendered {
            Ok(data) => Reply::Attachment {
                file_name: DECK_PDF_FILE,
                content_type: "application/pdf",
                data,
            },
            Err(e) => {
                error!("Error generating PDF: {}", e);
                Reply::Redirect(routes::DECK)
            }
        }
    }

    fn deck_pptx(&mut self) -> Reply {
        match pptx::build_pptx(&self.deck, &self.config.pptx) {
            Ok(data) => Reply::Attachment {
                file_name: PPTX_FILE,
                content_type:
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                data,
            },
            Err(e) => {
                error!("Error generating PPTX: {}", e);
                Reply::Failure(e.to_string())
            }
        }
    }
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| DeckError::ServerError(format!("Invalid header {}: {}", name, value)))
}

fn respond(request: Request, reply: Reply) -> Result<()> {
    let response = match reply {
        Reply::Html(body) => Response::from_string(body)
            .with_header(header("Content-Type", "text/html; charset=utf-8")?),
        Reply::Redirect(location) => Response::from_string("")
            .with_status_code(StatusCode(303))
            .with_header(header("Location", location)?),
        Reply::Attachment {
            file_name,
            content_type,
            data,
        } => Response::from_data(data)
            .with_header(header("Content-Type", content_type)?)
            .with_header(header(
                "Content-Disposition",
                &format!("attachment; filename=\"{}\"", file_name),
            )?),
        Reply::NotFound => {
            Response::from_string("404 Not Found").with_status_code(StatusCode(404))
        }
        Reply::Failure(message) => Response::from_string(message)
            .with_status_code(StatusCode(500))
            .with_header(header("Content-Type", "text/plain; charset=utf-8")?),
    };
    request
        .respond(response)
        .map_err(|e| DeckError::ServerError(format!("Failed to send response: {}", e)))
}

/// Serve the viewer until the process is stopped.
///
/// Requests are taken one at a time, so an export owns the cursor until it returns.
pub fn serve(deck: Deck, poster: Poster, config: ServeConfig) -> Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    let server = Server::http(&address)
        .map_err(|e| DeckError::ServerError(format!("Failed to start HTTP server: {}", e)))?;
    let mut viewer = Viewer::new(deck, poster, config)?;

    info!("HTTP server listening on http://{}", address);
    println!("Viewer running at http://{}", address);

    for request in server.incoming_requests() {
        let route = if *request.method() == Method::Get {
            Route::parse(request.url())
        } else {
            Route::NotFound
        };
        debug!("{} {} -> {:?}", request.method(), request.url(), route);

        let reply = viewer.handle(route);
        if let Err(e) = respond(request, reply) {
            warn!("{}", e);
        }
    }

    Ok(())
}
