//! Catalogue analytics.
//!
//! Pure functions over a product slice. Nothing is cached; callers recompute
//! from the current list. Every function is total over an empty slice.

use std::collections::BTreeMap;

use lockshop_core::{Category, Price, PriceBucket, Product};
use serde::Serialize;

/// Number of months kept by [`monthly_uploads`].
pub const MONTHS_SHOWN: usize = 6;

/// Number of y-axis labels on the monthly chart.
pub const AXIS_LABELS: usize = 6;

/// Products in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    /// Share of the catalogue, rounded on its own.
    pub percentage: u32,
}

/// Products created in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// Products in one price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRangeCount {
    pub range: &'static str,
    pub count: usize,
    pub percentage: u32,
}

/// Headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_products: usize,
    pub total_value: Price,
    pub average_price: Price,
    pub category_count: usize,
}

/// `round(100 * part / total)`, or 0 when `total` is 0.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 100 + total / 2) / total;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// `round(numerator / denominator)` for non-negative integers.
const fn div_round(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

/// Count products per category, in order of first appearance.
#[must_use]
pub fn category_distribution(products: &[Product]) -> Vec<CategoryCount> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for product in products {
        match counts.iter_mut().find(|(c, _)| *c == product.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((product.category, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count,
            percentage: percentage(count, products.len()),
        })
        .collect()
}

/// Count products per creation month, oldest first, keeping the latest
/// [`MONTHS_SHOWN`] months that have any uploads.
///
/// Products without a creation timestamp are left out.
#[must_use]
pub fn monthly_uploads(products: &[Product]) -> Vec<MonthlyCount> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for month in products.iter().filter_map(Product::created_month) {
        *months.entry(month).or_default() += 1;
    }

    let skip = months.len().saturating_sub(MONTHS_SHOWN);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

/// Count products in each price range. All four ranges are always present.
#[must_use]
pub fn price_distribution(products: &[Product]) -> Vec<PriceRangeCount> {
    PriceBucket::ALL
        .iter()
        .map(|&bucket| {
            let count = products
                .iter()
                .filter(|p| PriceBucket::for_price(p.price) == bucket)
                .count();
            PriceRangeCount {
                range: bucket.label(),
                count,
                percentage: percentage(count, products.len()),
            }
        })
        .collect()
}

#[must_use]
pub fn summary(products: &[Product]) -> Summary {
    let total: u64 = products.iter().map(|p| p.price.amount()).sum();
    let n = products.len() as u64;
    let average = if n == 0 { 0 } else { div_round(total, n) };
    let mut categories: Vec<Category> = products.iter().map(|p| p.category).collect();
    categories.sort_unstable();
    categories.dedup();

    Summary {
        total_products: products.len(),
        total_value: Price::new(total),
        average_price: Price::new(average),
        category_count: categories.len(),
    }
}

/// Bar heights for the monthly chart, as a percentage of the busiest month.
#[must_use]
pub fn bar_heights(monthly: &[MonthlyCount]) -> Vec<u32> {
    let max = monthly.iter().map(|m| m.count).max().unwrap_or(0);
    monthly.iter().map(|m| percentage(m.count, max)).collect()
}

/// Y-axis labels for the monthly chart, top to bottom.
#[must_use]
pub fn axis_labels(monthly: &[MonthlyCount]) -> Vec<u64> {
    let max = monthly.iter().map(|m| m.count as u64).max().unwrap_or(0);
    (0..AXIS_LABELS as u64)
        .map(|i| div_round(max * (5 - i), 5))
        .collect()
}

/// Everything the analytics page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub summary: Summary,
    pub categories: Vec<CategoryCount>,
    pub monthly: Vec<MonthlyCount>,
    pub bar_heights: Vec<u32>,
    pub axis_labels: Vec<u64>,
    pub price_ranges: Vec<PriceRangeCount>,
}

impl AnalyticsReport {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let monthly = monthly_uploads(products);
        Self {
            summary: summary(products),
            categories: category_distribution(products),
            bar_heights: bar_heights(&monthly),
            axis_labels: axis_labels(&monthly),
            price_ranges: price_distribution(products),
            monthly,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(category: &str, price: u64, created_at: Option<&str>) -> Product {
        let mut value = serde_json::json!({
            "_id": format!("{category}-{price}"),
            "name": "Lock",
            "category": category,
            "price": price,
        });
        if let Some(at) = created_at {
            value["createdAt"] = serde_json::Value::String(at.to_string());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_catalogue() {
        let report = AnalyticsReport::from_products(&[]);
        assert!(report.categories.is_empty());
        assert!(report.monthly.is_empty());
        assert!(report.bar_heights.is_empty());
        assert_eq!(report.axis_labels, [0, 0, 0, 0, 0, 0]);
        assert_eq!(report.price_ranges.len(), 4);
        assert!(report.price_ranges.iter().all(|r| r.count == 0 && r.percentage == 0));
        assert_eq!(report.summary.average_price, Price::ZERO);
        assert_eq!(report.summary.category_count, 0);
    }

    #[test]
    fn test_category_distribution_order_and_rounding() {
        let products = vec![
            product("Digital Locks", 10, None),
            product("Smart Locks", 10, None),
            product("Digital Locks", 10, None),
        ];
        let dist = category_distribution(&products);
        assert_eq!(dist[0].category, Category::DigitalLocks);
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].percentage, 67);
        assert_eq!(dist[1].category, Category::SmartLocks);
        assert_eq!(dist[1].percentage, 33);
        assert_eq!(dist.iter().map(|c| c.count).sum::<usize>(), products.len());
    }

    #[test]
    fn test_missing_category_counts_as_general() {
        let product: Product = serde_json::from_value(serde_json::json!({"_id": "x", "name": "Hinge"})).unwrap();
        let dist = category_distribution(&[product]);
        assert_eq!(dist[0].category, Category::General);
        assert_eq!(dist[0].percentage, 100);
    }

    #[test]
    fn test_monthly_uploads_keeps_last_six() {
        let products: Vec<Product> = [
            "2024-01-05T00:00:00Z",
            "2024-02-05T00:00:00Z",
            "2024-03-05T00:00:00Z",
            "2024-04-05T00:00:00Z",
            "2024-05-05T00:00:00Z",
            "2024-06-05T00:00:00Z",
            "2024-07-05T00:00:00Z",
            "2024-07-20T00:00:00Z",
        ]
        .into_iter()
        .map(|at| product("General", 1, Some(at)))
        .chain(std::iter::once(product("General", 1, None)))
        .collect();

        let monthly = monthly_uploads(&products);
        let months: Vec<&str> = monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, ["2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07"]);
        assert_eq!(monthly[5].count, 2);

        assert_eq!(bar_heights(&monthly), [50, 50, 50, 50, 50, 100]);
        assert_eq!(axis_labels(&monthly), [2, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn test_price_distribution_boundaries() {
        let products = vec![
            product("General", 49_999, None),
            product("General", 50_000, None),
            product("General", 100_000, None),
            product("General", 199_999, None),
            product("General", 200_000, None),
        ];
        let ranges = price_distribution(&products);
        let counts: Vec<usize> = ranges.iter().map(|r| r.count).collect();
        assert_eq!(counts, [1, 1, 2, 1]);
        assert_eq!(ranges[2].range, "100k-200k");
        assert_eq!(ranges[2].percentage, 40);
    }

    #[test]
    fn test_summary() {
        let products = vec![
            product("Smart Locks", 100_000, None),
            product("Smart Locks", 50_001, None),
            product("Door Hardware", 0, None),
        ];
        let summary = summary(&products);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_value, Price::new(150_001));
        assert_eq!(summary.average_price, Price::new(50_000));
        assert_eq!(summary.category_count, 2);
    }
}
