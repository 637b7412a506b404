//! Discount date-range status

use chrono::NaiveDate;
use shared::models::{Discount, DiscountStatus};

/// Status of a `[start, end]` range (both inclusive) as seen on `today`
pub fn discount_status(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> DiscountStatus {
    if today < start {
        DiscountStatus::Scheduled
    } else if today > end {
        DiscountStatus::Expired
    } else {
        DiscountStatus::Active
    }
}

#[inline]
pub fn is_active(discount: &Discount, today: NaiveDate) -> bool {
    discount_status(discount.start_date, discount.end_date, today) == DiscountStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_status_boundaries() {
        let start = date("2025-01-01");
        let end = date("2025-01-31");

        assert_eq!(discount_status(start, end, date("2024-12-31")), DiscountStatus::Scheduled);
        assert_eq!(discount_status(start, end, start), DiscountStatus::Active);
        assert_eq!(discount_status(start, end, date("2025-01-15")), DiscountStatus::Active);
        assert_eq!(discount_status(start, end, end), DiscountStatus::Active);
        assert_eq!(discount_status(start, end, date("2025-02-01")), DiscountStatus::Expired);
    }

    #[test]
    fn test_single_day_range() {
        let day = date("2025-06-15");
        assert_eq!(discount_status(day, day, day), DiscountStatus::Active);
        assert_eq!(
            discount_status(day, day, date("2025-06-16")),
            DiscountStatus::Expired
        );
    }
}
