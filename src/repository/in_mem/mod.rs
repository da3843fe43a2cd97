pub(crate) mod notification;
pub(crate) mod order;
pub(crate) mod profile;

use std::result::Result as DefaultResult;
use std::str::FromStr;

use crate::error::{AppError, AppErrorCode};
use crate::AppInMemFetchedSingleRow;

pub(super) fn corrupted_column(label: &str) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("column:{}", label)),
    }
}

// rows in the in-memory store keep every column as text, any decode
// failure means the row was written by incompatible code
pub(super) fn parse_column<T: FromStr>(
    row: &AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<T, AppError> {
    row.get(idx)
        .ok_or_else(|| corrupted_column(label))?
        .parse::<T>()
        .map_err(|_e| corrupted_column(label))
}

pub(super) fn pick_column<'a>(
    row: &'a AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<&'a str, AppError> {
    row.get(idx)
        .map(|v| v.as_str())
        .ok_or_else(|| corrupted_column(label))
}
