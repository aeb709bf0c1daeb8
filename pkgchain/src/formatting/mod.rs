//! Terminal output helpers shared by the commands.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::print_section_header;
pub use output::{print_key_value, print_summary_box};
pub use status::{print_error, print_info, print_success, print_warning, Status};
pub use tables::{print_actuality_table, print_order_table, ActualityRow};
