//! Production planning board: pipeline columns, delivery calendar and a
//! simulated capacity gauge.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use customer_ops_core::OrderStatus;

use crate::models::Order;

/// Daily production capacity in units.
pub const DAILY_CAPACITY: u32 = 100;
/// Units each confirmed or in-progress order is assumed to occupy.
pub const UNITS_PER_ACTIVE_ORDER: u32 = 10;

const CALENDAR_WEEKS: u64 = 4;

/// Orders in one pipeline status.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineColumn {
    pub status: OrderStatus,
    pub label: String,
    pub orders: Vec<Order>,
}

/// Orders due on one calendar day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub orders: Vec<Order>,
}

/// Capacity utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    pub daily: u32,
    pub utilized: u32,
    /// Whole percent, capped at 100.
    pub percent: u32,
}

impl Capacity {
    /// Capacity used by `active_orders` confirmed or in-progress orders.
    #[must_use]
    pub fn for_active_orders(active_orders: usize) -> Self {
        let active = u32::try_from(active_orders).unwrap_or(u32::MAX);
        let utilized = active.saturating_mul(UNITS_PER_ACTIVE_ORDER);
        let percent = (utilized.saturating_mul(100) / DAILY_CAPACITY).min(100);
        Self {
            daily: DAILY_CAPACITY,
            utilized,
            percent,
        }
    }
}

/// The production screen.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionBoard {
    pub pipeline: Vec<PipelineColumn>,
    /// Four weeks of seven days, starting on the Sunday of the current week.
    pub calendar: Vec<Vec<CalendarDay>>,
    pub capacity: Capacity,
}

impl ProductionBoard {
    /// Build the board from every order, relative to `today`.
    #[must_use]
    pub fn build(orders: &[Order], today: NaiveDate) -> Self {
        let pipeline = OrderStatus::PIPELINE
            .into_iter()
            .map(|status| PipelineColumn {
                status,
                label: status.label(),
                orders: orders
                    .iter()
                    .filter(|o| o.status == status)
                    .cloned()
                    .collect(),
            })
            .collect();

        let active = orders.iter().filter(|o| o.status.uses_capacity()).count();

        Self {
            pipeline,
            calendar: calendar(orders, today),
            capacity: Capacity::for_active_orders(active),
        }
    }
}

/// First day shown on the calendar.
#[must_use]
pub fn calendar_start(today: NaiveDate) -> NaiveDate {
    let back = u64::from(today.weekday().num_days_from_sunday());
    today.checked_sub_days(Days::new(back)).unwrap_or(today)
}

fn calendar(orders: &[Order], today: NaiveDate) -> Vec<Vec<CalendarDay>> {
    let start = calendar_start(today);
    (0..CALENDAR_WEEKS)
        .map(|week| {
            (0..7)
                .filter_map(|day| start.checked_add_days(Days::new(week * 7 + day)))
                .map(|date| CalendarDay {
                    date,
                    is_today: date == today,
                    orders: orders
                        .iter()
                        .filter(|o| o.delivery_date == Some(date))
                        .cloned()
                        .collect(),
                })
                .collect()
        })
        .collect()
}
