// Components module - reusable UI building blocks
//
// - Status bar: uptime, message count, latest warning, key hints
// - Toast: transient feedback for copy results
// - Scrollbar: shared helper for scrollable panels

pub mod scrollbar;
pub mod status_bar;
pub mod toast;

pub use status_bar::StatusInfo;
pub use toast::Toast;
