#![allow(dead_code)]

use chrono::NaiveDate;
use value_entity_derive::ValueEntity;

#[derive(Debug, Clone, ValueEntity)]
pub struct Address {
    pub street: Option<String>,
    pub building: Option<String>,
}

impl Address {
    pub fn new(street: Option<&str>, building: Option<&str>) -> Self {
        Self {
            street: street.map(str::to_string),
            building: building.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, ValueEntity)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonName {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
        }
    }
}

#[derive(Debug, Clone, ValueEntity)]
pub struct Person {
    pub name: PersonName,
    pub height: u32,
    pub birth_date: NaiveDate,
}

impl Person {
    pub fn new(name: PersonName, height: u32, birth_date: NaiveDate) -> Self {
        Self { name, height, birth_date }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
