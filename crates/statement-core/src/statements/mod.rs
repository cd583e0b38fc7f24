pub mod cash_flow;
pub mod line_items;
pub mod normalized;
pub mod numeric;
pub mod parser;
pub mod sheet;

pub use cash_flow::{
    cash_flow_series, extract_cash_flows, parse_cash_flow, CashFlowSeries, FCF_FALLBACK_WARNING,
};
pub use line_items::LineItem;
pub use normalized::{LineRow, NormalizedStatement, RowKey};
pub use parser::{parse_balance_sheet, parse_income_statement, parse_sheet, parse_statement, ParseOptions};
pub use sheet::{RawRow, RawSheet, SheetGrid, SheetLayout, StatementKind, Workbook};
