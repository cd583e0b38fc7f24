#![allow(dead_code)]

use statement_core::statements::{SheetGrid, Workbook};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Four title lines, the header on row 4, then the body.
fn grid(name: &str, header: &[&str], body: &[Vec<&str>]) -> SheetGrid {
    let mut rows = vec![
        row(&[name]),
        row(&["Организация: ПАО \"Пример\""]),
        row(&["Единица измерения: в тыс. рублей"]),
        row(&[]),
        row(header),
    ];
    rows.extend(body.iter().map(|r| row(r)));
    SheetGrid {
        name: name.to_string(),
        rows,
    }
}

/// Label in column 4, row code in 5, periods from 6.
pub fn income_sheet() -> SheetGrid {
    let line = |label, code, a, b| vec!["", "", "", "", label, code, a, b];
    grid(
        "Отчет о финансовых результатах",
        &["", "", "", "", "Наименование показателя", "Код", "За 2024 г.", "За 2023 г."],
        &[
            line("1", "", "3", "4"),
            line("Выручка", "2110", "1 000", "800"),
            line("Себестоимость продаж", "2120", "(600)", "(500)"),
            line("Валовая прибыль (убыток)", "2100", "400", "300"),
            line("Коммерческие расходы", "2210", "(100)", "(75)"),
            line("Управленческие расходы", "2220", "(100)", "(75)"),
            line("Прибыль (убыток) от продаж", "2200", "200", "150"),
            line("Проценты к уплате", "2330", "(40)", "(50)"),
            line("Прибыль (убыток) до налогообложения", "2300", "160", "100"),
            line("Чистая прибыль (убыток)", "2400", "100", "60"),
            line("Совокупный финансовый результат периода", "2500", "100", "60"),
        ],
    )
}

/// Label in column 3, row code in 4, three snapshots from 5.
pub fn balance_sheet() -> SheetGrid {
    let line = |label, code, a, b, c| vec!["", "", "", label, code, a, b, c];
    grid(
        "Бухгалтерский баланс",
        &[
            "",
            "",
            "",
            "Наименование показателя",
            "Код",
            "На 31 декабря 2024 г.",
            "На 31 декабря 2023 г.",
            "На 31 декабря 2022 г.",
        ],
        &[
            line("1", "2", "3", "4", "5"),
            line("АКТИВ", "", "", "", ""),
            line("Запасы", "1210", "150", "120", "100"),
            line("Дебиторская задолженность", "1230", "200", "180", "150"),
            line(
                "Финансовые вложения (за исключением денежных эквивалентов)",
                "1240",
                "20",
                "10",
                "-",
            ),
            line("Денежные средства и денежные эквиваленты", "1250", "80", "50", "40"),
            line("Итого по разделу II", "1200", "500", "400", "300"),
            line("БАЛАНС", "1600", "2 000", "1 800", "1 500"),
            line("ПАССИВ", "", "", "", ""),
            line("Итого по разделу III", "1300", "800", "700", "650"),
            line("Заемные средства", "1410", "300", "300", "200"),
            line("Заемные средства", "1510", "100", "50", "50"),
            line("Кредиторская задолженность", "1520", "120", "100", "90"),
            line("Итого по разделу V", "1500", "250", "250", "200"),
            line("БАЛАНС", "1700", "2 000", "1 800", "1 500"),
        ],
    )
}

/// Label in column 0, row code in 1, periods from 2.
pub fn cash_flow_sheet() -> SheetGrid {
    let line = |label, code, a, b| vec![label, code, a, b];
    grid(
        "Отчет о движении денежных средс",
        &["Наименование показателя", "Код", "За 2024 г.", "За 2023 г."],
        &[
            line("1", "2", "3", "4"),
            line("Денежные потоки от текущих операций", "", "", ""),
            line("Поступления - всего", "4110", "5 000", "4 000"),
            line("Сальдо денежных потоков от текущих операций", "4100", "600", "300"),
            line(
                "в том числе: в связи с приобретением, созданием, модернизацией, реконструкцией и подготовкой к использованию внеоборотных активов",
                "4221",
                "(450)",
                "(330)",
            ),
            line("прочие платежи", "4229", "-", "(-)"),
        ],
    )
}

pub fn workbook() -> Workbook {
    Workbook {
        sheets: vec![income_sheet(), balance_sheet(), cash_flow_sheet()],
    }
}

pub fn workbook_without_cash_flow() -> Workbook {
    Workbook {
        sheets: vec![income_sheet(), balance_sheet()],
    }
}

pub const MARKET_PAGES: &str = r#"{
    "tickers": {
        "EXMP": {
            "RSBU": {
                "years": ["2022", "2023", "2024"],
                "indicators": {
                    "eps": {"label": "EPS, руб", "cells": ["8", "9.5", "12.25"]},
                    "p_e": {"label": "P/E", "cells": ["7.5", "6.8", "5.1"]},
                    "p_s": {"label": "P/S", "cells": ["1.1", "0.9", "н/д"]},
                    "p_bv": {"label": "P/BV", "cells": ["0.8", "0.7", "0.9"]}
                }
            },
            "MSFO": {
                "years": ["2023", "2024"],
                "indicators": {
                    "ev_ebitda": {"label": "EV/EBITDA", "cells": ["4.2", "3.8"]},
                    "debt_ebitda": {"label": "Долг/EBITDA", "cells": ["1.1", "0.9"]}
                }
            }
        }
    }
}"#;
