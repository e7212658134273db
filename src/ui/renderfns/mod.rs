pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::{draw_header, tab_areas, HeaderInfo};
pub use utils::{centered_rect, ensure_valid_selection, truncate};
