//! The statutory line items the analysis depends on.
//!
//! Rows are matched by their statutory row code first and by a normalized
//! label second, so small wording drift in an export does not break lookups.

use serde::{Deserialize, Serialize};

use super::sheet::StatementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    // Income statement
    Revenue,
    CostOfSales,
    SalesProfit,
    InterestExpense,
    NetProfit,
    // Balance sheet
    CurrentAssets,
    Inventories,
    Receivables,
    ShortTermInvestments,
    Cash,
    TotalAssets,
    Equity,
    Borrowings,
    Payables,
    CurrentLiabilities,
    // Cash flow
    OperatingCashFlow,
    CapitalExpenditure,
}

impl LineItem {
    pub fn statement(&self) -> StatementKind {
        use LineItem::*;
        match self {
            Revenue | CostOfSales | SalesProfit | InterestExpense | NetProfit => {
                StatementKind::IncomeStatement
            }
            OperatingCashFlow | CapitalExpenditure => StatementKind::CashFlow,
            _ => StatementKind::BalanceSheet,
        }
    }

    /// Statutory row codes.
    pub fn codes(&self) -> &'static [&'static str] {
        use LineItem::*;
        match self {
            Revenue => &["2110"],
            CostOfSales => &["2120"],
            SalesProfit => &["2200"],
            InterestExpense => &["2330"],
            NetProfit => &["2400"],
            CurrentAssets => &["1200"],
            Inventories => &["1210"],
            Receivables => &["1230"],
            ShortTermInvestments => &["1240"],
            Cash => &["1250"],
            TotalAssets => &["1600"],
            Equity => &["1300"],
            Borrowings => &["1410", "1510"],
            Payables => &["1520"],
            CurrentLiabilities => &["1500"],
            OperatingCashFlow => &["4100"],
            CapitalExpenditure => &["4221"],
        }
    }

    /// Accepted labels; the first is the statutory wording.
    pub fn labels(&self) -> &'static [&'static str] {
        use LineItem::*;
        match self {
            Revenue => &["Выручка", "Revenue"],
            CostOfSales => &["Себестоимость продаж", "Cost of sales"],
            SalesProfit => &[
                "Прибыль (убыток) от продаж",
                "Operating profit",
                "Profit from sales",
            ],
            InterestExpense => &["Проценты к уплате", "Interest expense", "Interest payable"],
            NetProfit => &["Чистая прибыль (убыток)", "Net profit", "Net income"],
            CurrentAssets => &["Итого по разделу II", "Total current assets"],
            Inventories => &["Запасы", "Inventories"],
            Receivables => &["Дебиторская задолженность", "Accounts receivable"],
            ShortTermInvestments => &[
                "Финансовые вложения (за исключением денежных эквивалентов)",
                "Short-term investments",
            ],
            Cash => &[
                "Денежные средства и денежные эквиваленты",
                "Cash and cash equivalents",
            ],
            TotalAssets => &["БАЛАНС", "Total assets"],
            Equity => &["Итого по разделу III", "Total equity"],
            Borrowings => &["Заемные средства", "Borrowings"],
            Payables => &["Кредиторская задолженность", "Accounts payable"],
            CurrentLiabilities => &["Итого по разделу V", "Total current liabilities"],
            OperatingCashFlow => &[
                "Сальдо денежных потоков от текущих операций",
                "Net cash from operating activities",
            ],
            CapitalExpenditure => &[
                "в связи с приобретением, созданием, модернизацией, реконструкцией и подготовкой к использованию внеоборотных активов",
                "Purchase of non-current assets",
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        self.labels()[0]
    }

    pub fn matches_code(&self, code: &str) -> bool {
        let digits: String = code
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        !digits.is_empty() && self.codes().contains(&digits.as_str())
    }

    pub fn matches_label(&self, label: &str) -> bool {
        let wanted = normalize_label(label);
        self.labels().iter().any(|l| normalize_label(l) == wanted)
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Case-fold, keep letters and digits, collapse everything else to single
/// spaces. `"ВЫРУЧКА "` and `"выручка"` normalize equally.
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .replace('ё', "е")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
