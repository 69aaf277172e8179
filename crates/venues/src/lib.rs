pub mod camera;
pub mod category;
pub mod effect;
pub mod filter;
pub mod onboarding;
pub mod selection;
pub mod session;
pub mod sheet;
pub mod store;
pub mod venue;
pub mod viewport;

pub use camera::{CameraPolicy, CameraRequest};
pub use category::Category;
pub use effect::Effect;
pub use filter::{FilterDraft, FilterState};
pub use onboarding::{City, SurveyAnswers};
pub use selection::{SelectionCoordinator, SelectionState};
pub use session::*;
pub use sheet::{Layout, SheetSnap, SheetState};
pub use store::VenueStore;
pub use venue::*;
pub use viewport::{Occlusion, OcclusionSide, ViewportState};
