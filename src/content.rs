// ABOUTME: Fixed display content for the poster and the slide deck
// ABOUTME: Defines the slide data model and the single built-in content set

/// Color tag of an architecture layer, one per tier of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerColor {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: &'static str,
    pub description: &'static str,
    pub color: LayerColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// The variant part of a slide. Each variant is rendered by exactly one template.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideKind {
    Title {
        subtitle: &'static str,
        author: &'static str,
        institution: &'static str,
    },
    Content(Vec<Section>),
    Architecture(Vec<Layer>),
    Diagram,
    Features(Vec<Feature>),
    Conclusion(Vec<&'static str>),
    References(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub title: &'static str,
    pub background: String,
    pub kind: SlideKind,
}

/// The ordered, immutable list of slides.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    /// The healthcare information systems deck.
    pub fn healthcare() -> Self {
        Self::new(healthcare_slides())
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

pub const AUTHOR: &str = "Okuhle Gebashe";
pub const STUDENT_NUMBER: &str = "221797300";
pub const INSTITUTION: &str = "Cape Peninsula University of Technology";
pub const PROGRAMME: &str = "Advanced Diploma in ICT – Application Development";

pub const REFERENCES: [&str; 5] = [
    "Garces Rodriguez, L.M., Ampatzoglou, A., Avgeriou, P. and Nakagawa, E.Y. (2022). A Reference Architecture for Healthcare Supportive Home Systems. IEEE Access, 10, pp. 35965–35981.",
    "Gohar, A.N., Abdelmawgoud, S.A. and Farhan, M.S. (2022). A Patient-Centric Healthcare Framework Reference Architecture for Better Semantic Interoperability Based on Blockchain, Cloud, and IoT. IEEE Access, 10, pp. 92137–92157.",
    "Seebregts, C., Dane, P., Parsons, A.N., Fogwill, T., Barron, P., Benjamin, P. and Fraser, H.S.F. (2018). Designing for Scale: Optimising the Health Information System Architecture for Mobile Maternal Health Messaging in South Africa (MomConnect). BMJ Global Health, 3 (Suppl 2), pp. 1–7.",
    "Tummers, J., Tobi, H., Catal, C. and Tekinerdogan, B. (2021). Designing a Reference Architecture for Health Information Systems. BMC Medical Informatics and Decision Making, 21, pp. 1–14.",
    "Udekwe, E., Iwu, C.G. and Obadire, O.S. (2024). Impact of Human Resource Information System Performance for Sustainable Health Sector in South Africa. Electronic Journal of Knowledge Management, 22 (2), pp. 84–98.",
];

fn pexels(id: u32) -> String {
    format!("https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=1920")
}

fn healthcare_slides() -> Vec<Slide> {
    vec![
        Slide {
            title: "Designing Reference Architecture for Healthcare Information Systems in South Africa",
            background: pexels(3279203),
            kind: SlideKind::Title {
                subtitle: "",
                author: AUTHOR,
                institution: STUDENT_NUMBER,
            },
        },
        Slide {
            title: "Introduction",
            background: pexels(263402),
            kind: SlideKind::Content(vec![
                Section {
                    heading: "Context",
                    text: "South Africa's healthcare system faces significant digital transformation challenges in managing patient information across diverse public healthcare institutions.",
                },
                Section {
                    heading: "Current State",
                    text: "Multiple fragmented systems with limited interoperability, creating data silos and inefficiencies in patient care delivery.",
                },
                Section {
                    heading: "Need",
                    text: "A unified, scalable reference architecture to standardize health information systems while ensuring security and compliance with regulations.",
                },
            ]),
        },
        Slide {
            title: "Problem Statement",
            background: pexels(4386466),
            kind: SlideKind::Content(vec![
                Section {
                    heading: "Key Challenges",
                    text: "Lack of standardized architecture for health information systems in South African public healthcare institutions.",
                },
                Section {
                    heading: "Impact",
                    text: "Limited interoperability between systems, data security concerns, and inefficient patient care coordination across facilities.",
                },
                Section {
                    heading: "Consequences",
                    text: "Delays in treatment decisions, duplicate testing, increased healthcare costs, and compromised patient safety.",
                },
            ]),
        },
        Slide {
            title: "Research Methodology",
            background: pexels(3825517),
            kind: SlideKind::Content(vec![
                Section {
                    heading: "Approach",
                    text: "Design Science Research (DSR) methodology combining literature review, case studies, and architectural design principles.",
                },
                Section {
                    heading: "Analysis",
                    text: "Comprehensive examination of existing health information systems, international best practices, and South African healthcare requirements.",
                },
                Section {
                    heading: "Development",
                    text: "Iterative design and validation of reference architecture components with stakeholder engagement.",
                },
            ]),
        },
        Slide {
            title: "Proposed Reference Architecture",
            background: pexels(3861969),
            kind: SlideKind::Architecture(vec![
                Layer {
                    name: "Presentation Layer",
                    description: "User interfaces for healthcare providers and patients",
                    color: LayerColor::Blue,
                },
                Layer {
                    name: "Application Layer",
                    description: "Core clinical and administrative applications",
                    color: LayerColor::Green,
                },
                Layer {
                    name: "Integration Layer",
                    description: "APIs and interoperability services",
                    color: LayerColor::Yellow,
                },
                Layer {
                    name: "Data Layer",
                    description: "Secure data storage and management",
                    color: LayerColor::Orange,
                },
                Layer {
                    name: "Infrastructure Layer",
                    description: "Cloud and on-premise infrastructure",
                    color: LayerColor::Red,
                },
            ]),
        },
        Slide {
            title: "System Architecture Diagram",
            background: pexels(3861969),
            kind: SlideKind::Diagram,
        },
        Slide {
            title: "Key Components",
            background: pexels(4386467),
            kind: SlideKind::Features(vec![
                Feature {
                    icon: "🔒",
                    title: "Security Framework",
                    description: "POPIA-compliant security with encryption, access control, and audit trails",
                },
                Feature {
                    icon: "🔄",
                    title: "Interoperability",
                    description: "HL7 FHIR standards for seamless data exchange between systems",
                },
                Feature {
                    icon: "📊",
                    title: "Data Analytics",
                    description: "Business intelligence and reporting for informed decision-making",
                },
                Feature {
                    icon: "☁️",
                    title: "Cloud Infrastructure",
                    description: "Scalable hybrid cloud architecture for flexibility and growth",
                },
                Feature {
                    icon: "👥",
                    title: "Patient-Centric",
                    description: "Unified patient records accessible across healthcare facilities",
                },
                Feature {
                    icon: "⚡",
                    title: "Performance",
                    description: "Optimized for high-volume transactions and real-time data access",
                },
            ]),
        },
        Slide {
            title: "Expected Benefits",
            background: pexels(127873),
            kind: SlideKind::Content(vec![
                Section {
                    heading: "Clinical Excellence",
                    text: "Improved patient care quality through comprehensive health records and clinical decision support systems.",
                },
                Section {
                    heading: "Operational Efficiency",
                    text: "Streamlined workflows, reduced administrative burden, and optimized resource utilization across facilities.",
                },
                Section {
                    heading: "Strategic Value",
                    text: "Enhanced data analytics capabilities for policy-making, research, and public health management.",
                },
            ]),
        },
        Slide {
            title: "Implementation Considerations",
            background: pexels(3825569),
            kind: SlideKind::Content(vec![
                Section {
                    heading: "Phased Approach",
                    text: "Gradual rollout starting with pilot facilities, followed by regional expansion and national integration.",
                },
                Section {
                    heading: "Change Management",
                    text: "Comprehensive training programs, stakeholder engagement, and user adoption strategies.",
                },
                Section {
                    heading: "Sustainability",
                    text: "Long-term support model with continuous improvement, monitoring, and governance frameworks.",
                },
            ]),
        },
        Slide {
            title: "Conclusion",
            background: pexels(256417),
            kind: SlideKind::Conclusion(vec![
                "Comprehensive framework for healthcare information systems transformation",
                "Addresses critical challenges of interoperability, security, and scalability",
                "Supports sustainable healthcare delivery and improved patient outcomes",
                "Ensures compliance with national data protection regulations",
                "Provides foundation for digital health innovation in South Africa",
            ]),
        },
        Slide {
            title: "References",
            background: pexels(3825569),
            kind: SlideKind::References(REFERENCES.to_vec()),
        },
    ]
}

/// A titled poster block with an optional lead sentence and labelled bullets.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterSection {
    pub heading: &'static str,
    pub body: &'static str,
    pub bullets: Vec<(&'static str, &'static str)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub title: &'static str,
    pub author: &'static str,
    pub student_number: &'static str,
    pub institution: &'static str,
    pub programme: &'static str,
    pub introduction: &'static str,
    pub problem: &'static str,
    pub aim: &'static str,
    pub objectives: Vec<&'static str>,
    pub key_features: Vec<(&'static str, &'static str)>,
    pub methodology: PosterSection,
    pub findings: PosterSection,
    pub conclusion: &'static str,
    pub references: Vec<&'static str>,
    pub report_url: &'static str,
    pub footer: &'static str,
}

impl Poster {
    /// The A2 research poster.
    pub fn healthcare() -> Self {
        Self {
            title: "Designing a Reference Architecture for Health Information Systems in South Africa",
            author: AUTHOR,
            student_number: STUDENT_NUMBER,
            institution: INSTITUTION,
            programme: PROGRAMME,
            introduction: "South Africa's healthcare system faces significant challenges due to fragmented Health Information Systems (HIS). The lack of standardized architecture results in poor interoperability between systems, inefficient data management, and compliance issues with data protection regulations such as POPIA. A unified reference architecture is essential to transform healthcare delivery, improve patient outcomes, and ensure efficient resource allocation across public healthcare institutions.",
            problem: "South Africa's public healthcare system lacks a unified reference architecture for Health Information Systems, leading to inefficiencies, poor data integration across facilities, fragmented patient records, and significant compliance risks regarding data privacy and security.",
            aim: "To design a scalable, interoperable, and secure reference architecture for Health Information Systems that improves data flow, enhances operational efficiency, and ensures compliance with the Protection of Personal Information Act (POPIA) across South African healthcare institutions.",
            objectives: vec![
                "Identify stakeholder needs and architectural requirements for HIS",
                "Develop a modular, scalable, and secure reference architecture framework",
                "Evaluate its feasibility in real-world healthcare contexts",
            ],
            key_features: vec![
                ("🛡️", "POPIA Compliance"),
                ("🗄️", "Data Interoperability"),
                ("🖥️", "Scalable Infrastructure"),
            ],
            methodology: PosterSection {
                heading: "Methodology",
                body: "This research employs a qualitative research design combining:",
                bullets: vec![
                    ("Literature Review", "Analysis of existing HIS frameworks and architectural patterns"),
                    ("System Analysis", "Evaluation of current South African healthcare systems"),
                    ("Case Studies", "Real-world implementation scenarios"),
                    ("Expert Validation", "Consultation with healthcare IT professionals"),
                ],
            },
            findings: PosterSection {
                heading: "Findings",
                body: "The proposed reference architecture demonstrates significant potential for:",
                bullets: vec![
                    ("Enhanced Interoperability", "Seamless data exchange between healthcare facilities"),
                    ("Improved Data Security", "Compliance with POPIA through robust security layers"),
                    ("Operational Efficiency", "Reduced duplication and streamlined workflows"),
                    ("Scalability", "Adaptable framework for growing healthcare demands"),
                ],
            },
            conclusion: "The proposed reference architecture provides a comprehensive framework for transforming South Africa's healthcare information systems. By addressing critical challenges of interoperability, security, and scalability, this architecture supports sustainable healthcare transformation and improved patient care delivery. Implementation of this framework can significantly enhance the efficiency and effectiveness of public healthcare institutions while ensuring compliance with national data protection regulations.",
            references: REFERENCES.to_vec(),
            report_url: "https://1drv.ms/w/c/700679b871348793/ETWlOmqEII9OloAondbM53gB9wjFMz2-aeJJmv2Fwx5ROA?e=1Enoj4",
            footer: "Research Poster | Cape Peninsula University of Technology | 2024",
        }
    }
}
