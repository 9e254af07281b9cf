pub mod client;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod settings;
pub mod surface;
pub mod taxonomy;
pub mod theme;

pub use client::{AnalysisClient, AnalysisResponse, Endpoint, HttpAnalysisClient};
pub use controller::{Event, Phase, Transition, UploadController};
pub use error::{TransportError, UploadError};
pub use model::{
    AcceptedType, AnalysisRequest, AnalysisResult, Finding, FindingCategory, UploadedFile,
    Verdict,
};
pub use render::{render, render_report, OutputFormat, ResultsView};
pub use settings::Settings;
pub use surface::{Notice, RecordingSurface, Surface};
pub use taxonomy::Taxonomy;
pub use theme::{FileThemeStore, MemoryThemeStore, ThemeController, ThemePreference, ThemeStore};
