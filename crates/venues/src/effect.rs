use foundation::VenueId;

use crate::camera::CameraRequest;
use crate::sheet::SheetSnap;

/// Side effect requested by the session; the caller performs it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Camera(CameraRequest),
    OpenDetails(VenueId),
    CloseDetails,
    /// `Some(slug)` sets the `restaurant` query parameter, `None` removes it.
    PushDeepLink(Option<String>),
    RestoreSheetSnap(SheetSnap),
    SnapDetailsSheet(SheetSnap),
    PersistOnboarded,
}
