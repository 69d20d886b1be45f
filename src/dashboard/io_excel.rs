// Roster import from Excel workbooks.

use calamine::DataType;
use std::collections::HashSet;

use crate::dashboard::{
    io_common::{is_plausible_name, make_default_id},
    *,
};

const NAME_PATTERNS: [&str; 4] = ["name", "caregiver", "employee", "staff"];

/// Where to find the name of the employee in a row.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum NameColumns {
    FirstLast(usize, usize),
    Full(usize),
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct RosterColumns {
    name: NameColumns,
    entries: Option<usize>,
    id: Option<usize>,
    department: Option<usize>,
}

pub fn read_excel_roster(path: String, src: &RosterSource) -> BCliResult<Vec<EmployeeRecord>> {
    let wrange = get_range(&path, src)?;
    let rows: Vec<&[DataType]> = wrange.rows().collect();
    parse_roster_rows(&path, &rows, src)
}

fn parse_roster_rows(
    path: &str,
    rows: &[&[DataType]],
    src: &RosterSource,
) -> BCliResult<Vec<EmployeeRecord>> {
    let default_id = make_default_id(path);
    let header: Vec<String> = rows
        .first()
        .context(EmptyExcelSnafu {})?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("parse_roster_rows: header: {:?}", header);

    let columns = detect_columns(&header, src)?;
    info!("Roster columns in {:?}: {:?}", path, columns);
    if columns.entries.is_none() {
        warn!(
            "No entries column in {:?}: all the employees start with 0 entries",
            path
        );
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<EmployeeRecord> = Vec::new();
    for (idx, row) in rows.iter().skip(1).enumerate() {
        // The header is the first line
        let lineno = idx + 2;
        let name = match columns.name {
            NameColumns::FirstLast(first_idx, last_idx) => {
                let first = row.get(first_idx).map(cell_to_string).unwrap_or_default();
                let last = row.get(last_idx).map(cell_to_string).unwrap_or_default();
                if is_plausible_part(&first) && is_plausible_part(&last) {
                    format!("{} {}", first, last)
                } else {
                    String::new()
                }
            }
            NameColumns::Full(col_idx) => row.get(col_idx).map(cell_to_string).unwrap_or_default(),
        };
        if !is_plausible_name(&name) {
            debug!("parse_roster_rows: line {}: skipping {:?}", lineno, row);
            continue;
        }
        if !seen.insert(name.clone()) {
            debug!("parse_roster_rows: line {}: duplicate {:?}", lineno, name);
            continue;
        }

        let total_entries = match columns.entries.and_then(|i| row.get(i)) {
            Some(cell) => read_entries(cell, lineno)?,
            None => 0,
        };
        let id = columns
            .id
            .and_then(|i| row.get(i))
            .map(cell_to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_id(lineno));
        let department = columns
            .department
            .and_then(|i| row.get(i))
            .map(cell_to_string)
            .filter(|s| !s.is_empty());

        res.push(EmployeeRecord {
            id,
            name,
            total_entries,
            department,
        });
    }
    info!(
        "Read {} employees from {} rows in {:?}",
        res.len(),
        rows.len().saturating_sub(1),
        path
    );
    Ok(res)
}

fn is_plausible_part(s: &str) -> bool {
    !s.is_empty() && !matches!(s.to_lowercase().as_str(), "none" | "null" | "nan")
}

fn find_header(header: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    header
        .iter()
        .position(|h| pred(h.to_lowercase().trim()))
}

fn detect_columns(header: &[String], src: &RosterSource) -> CliResult<RosterColumns> {
    let id = match src.id_column_index_int()? {
        Some(i) => Some(i),
        None => find_header(header, |h| h == "id" || h.contains("employee id")),
    };
    let entries = match src.entries_column_index_int()? {
        Some(i) => Some(i),
        None => find_header(header, |h| h.contains("entries") || h.contains("points")),
    };
    let department = match src.department_column_index_int()? {
        Some(i) => Some(i),
        None => find_header(header, |h| h.contains("department")),
    };

    let name = if let Some(i) = src.name_column_index_int()? {
        NameColumns::Full(i)
    } else {
        let first = find_header(header, |h| h.contains("first") && h.contains("name"));
        let last = find_header(header, |h| h.contains("last") && h.contains("name"));
        let full = find_header(header, |h| {
            h.contains("name")
                && ["full", "employee", "caregiver", "staff"]
                    .iter()
                    .any(|p| h.contains(p))
        });
        let any_name = header.iter().enumerate().position(|(idx, h)| {
            let h = h.to_lowercase();
            Some(idx) != id && NAME_PATTERNS.iter().any(|p| h.contains(p))
        });
        match (first, last, full, any_name) {
            (Some(f), Some(l), _, _) => NameColumns::FirstLast(f, l),
            (_, _, Some(c), _) => NameColumns::Full(c),
            (_, _, _, Some(c)) => NameColumns::Full(c),
            // Last resort: the first column.
            _ => NameColumns::Full(0),
        }
    };

    for idx in [Some(name_column(name)), entries, id, department]
        .iter()
        .flatten()
    {
        if *idx >= header.len() {
            return ColumnOutOfRangeSnafu { index: *idx + 1 }.fail();
        }
    }

    Ok(RosterColumns {
        name,
        entries,
        id,
        department,
    })
}

fn name_column(name: NameColumns) -> usize {
    match name {
        NameColumns::FirstLast(f, l) => f.max(l),
        NameColumns::Full(c) => c,
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn read_entries(cell: &DataType, lineno: usize) -> BCliResult<u64> {
    let res = match cell {
        DataType::Int(i) if *i >= 0 => Some(*i as u64),
        DataType::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
        DataType::String(s) if s.trim().is_empty() => Some(0),
        DataType::String(s) => s.trim().parse::<u64>().ok(),
        DataType::Empty => Some(0),
        _ => None,
    };
    res.ok_or_else(|| {
        Box::new(RaffleCliError::ExcelWrongCellType {
            lineno: lineno as u64,
            content: format!("{:?}", cell),
        })
    })
}

fn get_range(path: &String, src: &RosterSource) -> BCliResult<calamine::Range<DataType>> {
    let worksheet_name_o = src.excel_worksheet_name.clone();
    debug!(
        "read_excel_roster: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path: path.clone() })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(RaffleCliError::EmptyExcel {})),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_roster: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => Err(Box::new(RaffleCliError::AmbiguousWorksheet { path: path.clone() })),
        }
    }
}
