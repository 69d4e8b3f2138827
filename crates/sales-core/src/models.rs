use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RowError, SalesError};

/// Group key used for lines whose optional dimension value is absent.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Sales channel of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    Online,
    #[serde(rename = "In-store")]
    InStore,
}

impl Channel {
    /// Every channel, in display order.
    pub const ALL: [Channel; 2] = [Channel::InStore, Channel::Online];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Online => "Online",
            Channel::InStore => "In-store",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = RowError;

    /// Case-insensitive; accepts `In-store`, `In store`, `instore` and
    /// `In_store` for the physical channel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '_'))
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "online" => Ok(Channel::Online),
            "instore" => Ok(Channel::InStore),
            _ => Err(RowError::UnknownChannel(s.trim().to_string())),
        }
    }
}

/// Loyalty bucket of the purchasing customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerSegment {
    Regular,
    New,
    Loyal,
}

impl CustomerSegment {
    pub const ALL: [CustomerSegment; 3] = [
        CustomerSegment::Regular,
        CustomerSegment::New,
        CustomerSegment::Loyal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSegment::Regular => "Regular",
            CustomerSegment::New => "New",
            CustomerSegment::Loyal => "Loyal",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerSegment {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(CustomerSegment::Regular),
            "new" => Ok(CustomerSegment::New),
            "loyal" => Ok(CustomerSegment::Loyal),
            _ => Err(RowError::UnknownSegment(s.trim().to_string())),
        }
    }
}

/// Discount attached to a line, in whichever form the source file used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Discount {
    #[default]
    None,
    /// Fraction of the gross amount, within `[0, 1]`.
    Fraction(f64),
    /// Absolute currency amount subtracted from the gross amount.
    Amount(f64),
}

/// One row of the data file exactly as read, before validation.
///
/// Every field is optional so that a row with gaps still deserializes and
/// can be reported precisely by the derived-field computer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSalesRow {
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub store_id: Option<String>,
    pub store_location: Option<String>,
    pub channel: Option<String>,
    pub product_category: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub discount: Option<String>,
    pub discount_applied: Option<String>,
    pub customer_id: Option<String>,
    pub customer_segment: Option<String>,
}

/// A validated sales line with its derived fields populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesLine {
    /// Order identifier; several lines may share one.
    pub order_id: String,
    pub date: NaiveDate,
    pub store_id: Option<String>,
    pub store_location: String,
    pub channel: Channel,
    pub product_category: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount: Discount,
    pub customer_id: Option<String>,
    pub customer_segment: Option<CustomerSegment>,
    /// `quantity * unit_price` after discount, never negative.
    pub line_revenue: f64,
    pub day_of_week: Weekday,
}

/// A categorical field usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    StoreLocation,
    StoreId,
    Channel,
    ProductCategory,
    ProductName,
    CustomerSegment,
    CustomerId,
    DayOfWeek,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::StoreLocation,
        Dimension::StoreId,
        Dimension::Channel,
        Dimension::ProductCategory,
        Dimension::ProductName,
        Dimension::CustomerSegment,
        Dimension::CustomerId,
        Dimension::DayOfWeek,
    ];

    /// Column name of the dimension in the data file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::StoreLocation => "store_location",
            Dimension::StoreId => "store_id",
            Dimension::Channel => "channel",
            Dimension::ProductCategory => "product_category",
            Dimension::ProductName => "product_name",
            Dimension::CustomerSegment => "customer_segment",
            Dimension::CustomerId => "customer_id",
            Dimension::DayOfWeek => "day_of_week",
        }
    }

    /// Human-readable heading.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::StoreLocation => "Store Location",
            Dimension::StoreId => "Store ID",
            Dimension::Channel => "Channel",
            Dimension::ProductCategory => "Product Category",
            Dimension::ProductName => "Product",
            Dimension::CustomerSegment => "Customer Segment",
            Dimension::CustomerId => "Customer",
            Dimension::DayOfWeek => "Day of Week",
        }
    }

    /// Group key of `line` under this dimension.
    pub fn key<'a>(&self, line: &'a SalesLine) -> &'a str {
        match self {
            Dimension::StoreLocation => &line.store_location,
            Dimension::StoreId => line.store_id.as_deref().unwrap_or(UNKNOWN_KEY),
            Dimension::Channel => line.channel.as_str(),
            Dimension::ProductCategory => &line.product_category,
            Dimension::ProductName => &line.product_name,
            Dimension::CustomerSegment => line
                .customer_segment
                .map(|s| s.as_str())
                .unwrap_or(UNKNOWN_KEY),
            Dimension::CustomerId => line.customer_id.as_deref().unwrap_or(UNKNOWN_KEY),
            Dimension::DayOfWeek => weekday_name(line.day_of_week),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "store_location" | "store" | "location" => Ok(Dimension::StoreLocation),
            "store_id" => Ok(Dimension::StoreId),
            "channel" => Ok(Dimension::Channel),
            "product_category" | "category" => Ok(Dimension::ProductCategory),
            "product_name" | "product" => Ok(Dimension::ProductName),
            "customer_segment" | "segment" => Ok(Dimension::CustomerSegment),
            "customer_id" | "customer" => Ok(Dimension::CustomerId),
            "day_of_week" | "weekday" => Ok(Dimension::DayOfWeek),
            other => Err(SalesError::UnknownDimension(other.to_string())),
        }
    }
}

/// Full English day name (`"Monday"`).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
