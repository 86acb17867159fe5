pub mod range;

pub use range::{cell_address, col_to_letter, parse_cell_ref, parse_range_ref, CellRange};
