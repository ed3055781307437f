//! Station Commands

use serde::Serialize;

use reorder::SubmitError;
use crate::models::Station;
use super::{get_json, post_json};

#[derive(Serialize)]
struct CreateStationArgs<'a> {
    name: &'a str,
}

pub async fn list_stations() -> Result<Vec<Station>, SubmitError> {
    get_json("/stations").await
}

pub async fn create_station(name: &str) -> Result<Station, SubmitError> {
    post_json("/stations", &CreateStationArgs { name }).await
}
