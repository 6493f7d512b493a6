//! SQL Module
//!
//! `INSERT ... VALUES`文のリテラルを文字単位で走査し、カテゴリ行を取り出します。
//! SQL文法全体は扱わず、クォートと括弧のネストのみを解釈します。

mod rows;
mod scanner;
mod tokens;

pub use rows::{is_uuid, parse_category_rows, CategoryRow, MIN_FIELDS};
pub use scanner::{extract_values_clause, split_fields, split_records};
pub use tokens::SqlValue;
