//! Spending data transformation for charts.
//!
//! Turns the analytics the backend computes into the label and value series
//! the charts plot.

use crate::category::{Category, CustomCategory, resolve_category};

/// Slices making up at most this share of total spending are merged into
/// one "Other" slice.
pub(super) const MIN_SLICE_SHARE: f64 = 0.04;

/// The label of the slice holding the small categories.
pub(super) const OTHER_LABEL: &str = "Other";

/// Spending per category as `(label, amount spent)` pie slices.
///
/// Amounts arrive negative for spending and are flipped so slices are
/// positive. Categories with no net spending are dropped, and categories
/// whose share of the total is at most [MIN_SLICE_SHARE] are summed into an
/// "Other" slice at the end.
pub(super) fn spending_by_category(
    by_category: &[(Category, (u32, f64))],
    custom_categories: &[CustomCategory],
) -> Vec<(String, f64)> {
    let spent: Vec<(Category, f64)> = by_category
        .iter()
        .map(|(category, (_, amount))| (*category, -amount))
        .filter(|(_, amount)| *amount > 0.0)
        .collect();
    let total: f64 = spent.iter().map(|(_, amount)| amount).sum();

    let mut slices = Vec::new();
    let mut other = 0.0;

    for (category, amount) in spent {
        if amount / total <= MIN_SLICE_SHARE {
            other += amount;
        } else {
            let name = resolve_category(category, custom_categories).name;
            slices.push((name.to_owned(), amount));
        }
    }

    if other > 0.0 {
        slices.push((OTHER_LABEL.to_owned(), other));
    }

    slices
}

/// Net income per time bucket: income plus (negative) spending.
///
/// Buckets are paired by position and labelled with the spending series'
/// labels. Extra buckets in the longer series are ignored.
pub(super) fn net_income_over_time(
    income: &[(String, f64)],
    spending: &[(String, f64)],
) -> (Vec<String>, Vec<f64>) {
    spending
        .iter()
        .zip(income)
        .map(|((label, spent), (_, earned))| (label.clone(), earned + spent))
        .unzip()
}

/// Split `(label, value)` pairs into the label and value series.
pub(super) fn labels_and_values(pairs: &[(String, f64)]) -> (Vec<String>, Vec<f64>) {
    pairs.iter().cloned().unzip()
}

#[cfg(test)]
mod tests {
    use crate::category::{Category, CustomCategory};

    use super::{
        OTHER_LABEL, labels_and_values, net_income_over_time, spending_by_category,
    };

    #[test]
    fn small_categories_are_grouped_into_other() {
        let by_category = vec![
            (Category::from(0), (10, -500.0)),
            (Category::from(1), (3, -460.0)),
            (Category::from(2), (1, -25.0)),
            (Category::from(3), (1, -15.0)),
        ];

        let slices = spending_by_category(&by_category, &[]);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[2], (OTHER_LABEL.to_owned(), 40.0));
        assert_eq!(slices[0].1, 500.0);
    }

    #[test]
    fn share_of_exactly_four_percent_goes_to_other() {
        let by_category = vec![
            (Category::from(0), (1, -96.0)),
            (Category::from(1), (1, -4.0)),
        ];

        let slices = spending_by_category(&by_category, &[]);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1], (OTHER_LABEL.to_owned(), 4.0));
    }

    #[test]
    fn custom_categories_are_named() {
        let custom = vec![CustomCategory {
            id: 7,
            name: "Hobbies".to_owned(),
        }];

        let slices = spending_by_category(&[(Category::Custom(7), (2, -80.0))], &custom);

        assert_eq!(slices, vec![("Hobbies".to_owned(), 80.0)]);
    }

    #[test]
    fn income_categories_are_left_out() {
        let by_category = vec![
            (Category::from(0), (1, -50.0)),
            (Category::from(1), (1, 900.0)),
        ];

        let slices = spending_by_category(&by_category, &[]);

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].1, 50.0);
    }

    #[test]
    fn no_spending_gives_no_slices() {
        assert!(spending_by_category(&[], &[]).is_empty());
    }

    #[test]
    fn net_income_adds_income_and_spending() {
        let income = vec![("Jan".to_owned(), 3000.0), ("Feb".to_owned(), 2500.0)];
        let spending = vec![("Jan".to_owned(), -1200.0), ("Feb".to_owned(), -2700.0)];

        let (labels, values) = net_income_over_time(&income, &spending);

        assert_eq!(labels, vec!["Jan", "Feb"]);
        assert_eq!(values, vec![1800.0, -200.0]);
    }

    #[test]
    fn splits_pairs() {
        let (labels, values) = labels_and_values(&[("Jan".to_owned(), -5.0)]);

        assert_eq!(labels, vec!["Jan"]);
        assert_eq!(values, vec![-5.0]);
    }
}
