//! Market-basket style recommendations over delivery rows.
//!
//! Four independent views computed in a single pass over the row set:
//! popularity ranking, per-category breakdown, order-level co-occurrence
//! pairs, and a recency-windowed trend ranking.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::table::{ColumnRef, Row};

/// Number of distinct dates in each trending window.
pub const TREND_WINDOW_DAYS: usize = 7;

/// An item ranked by raw occurrence count.
///
/// `percentage` is the item's share of *distinct orders*, not of row
/// occurrences, and can exceed 100 when an item repeats within orders. That
/// ratio base is part of the engine's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub item: String,
    pub order_count: u64,
    /// Share of distinct orders, percent, rounded to one decimal.
    pub percentage: f64,
}

/// An item's count within one category bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub category: String,
    pub item: String,
    pub order_count: u64,
}

/// Two items and the number of distinct orders containing both.
///
/// Pairs are canonical: `item1 < item2` lexicographically, so `(A, B)` and
/// `(B, A)` always collapse into one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPair {
    pub item1: String,
    pub item2: String,
    pub count: u64,
}

/// An item ranked by its recent-versus-older volume ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub item: String,
    pub recent_count: u64,
    /// Relative change versus the older window; equals `recent_count` for
    /// items with no older history (cold start reads as a strong signal).
    pub trend: f64,
}

/// The four recommendation views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub popular_items: Vec<PopularItem>,
    pub by_category: Vec<CategoryItem>,
    pub frequently_bought_together: Vec<ItemPair>,
    pub trending: Vec<TrendingItem>,
}

/// Resolved columns the recommendation pass reads from each row.
#[derive(Debug, Clone)]
pub struct RecommendColumns {
    pub item: ColumnRef,
    pub category: ColumnRef,
    pub order_id: ColumnRef,
    pub date: ColumnRef,
}

/// Compute all four recommendation views from the row set.
///
/// Rows with an empty item value contribute nothing to item-based views;
/// rows with an empty order id still count their item but join no basket.
/// Each ranked view is truncated to `top_n` entries (`top_n * 5` for the
/// category breakdown, which fans out across buckets). Ranking ties break
/// lexicographically so output is deterministic.
pub fn recommend(rows: &[Row], columns: &RecommendColumns, top_n: usize) -> Recommendations {
    let mut item_counts: HashMap<String, u64> = HashMap::new();
    let mut category_items: HashMap<String, HashMap<String, u64>> = HashMap::new();
    let mut order_ids: HashSet<String> = HashSet::new();
    let mut order_items: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut date_items: BTreeMap<String, HashMap<String, u64>> = BTreeMap::new();

    for row in rows {
        let item = row.get(&columns.item);
        let category = row.get(&columns.category);
        let order_id = row.get(&columns.order_id);
        let date = row.get(&columns.date);

        if !order_id.is_empty() {
            order_ids.insert(order_id.to_string());
        }

        if item.is_empty() {
            continue;
        }

        *item_counts.entry(item.to_string()).or_insert(0) += 1;

        if !category.is_empty() {
            *category_items
                .entry(category.to_string())
                .or_default()
                .entry(item.to_string())
                .or_insert(0) += 1;
        }

        if !order_id.is_empty() {
            order_items
                .entry(order_id.to_string())
                .or_default()
                .insert(item.to_string());
        }

        if !date.is_empty() {
            *date_items
                .entry(date.to_string())
                .or_default()
                .entry(item.to_string())
                .or_insert(0) += 1;
        }
    }

    Recommendations {
        popular_items: rank_popular(item_counts, order_ids.len(), top_n),
        by_category: rank_by_category(category_items, top_n * 5),
        frequently_bought_together: rank_pairs(&order_items, top_n),
        trending: rank_trending(&date_items, top_n),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rank_popular(
    item_counts: HashMap<String, u64>,
    total_orders: usize,
    top_n: usize,
) -> Vec<PopularItem> {
    let mut ranked: Vec<(String, u64)> = item_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .map(|(item, count)| {
            let percentage = if total_orders == 0 {
                0.0
            } else {
                round1(count as f64 / total_orders as f64 * 100.0)
            };
            PopularItem {
                item,
                order_count: count,
                percentage,
            }
        })
        .collect()
}

fn rank_by_category(
    category_items: HashMap<String, HashMap<String, u64>>,
    cap: usize,
) -> Vec<CategoryItem> {
    let mut flattened: Vec<CategoryItem> = category_items
        .into_iter()
        .flat_map(|(category, items)| {
            items.into_iter().map(move |(item, count)| CategoryItem {
                category: category.clone(),
                item,
                order_count: count,
            })
        })
        .collect();

    flattened.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.item.cmp(&b.item))
    });
    flattened.truncate(cap);
    flattened
}

fn rank_pairs(order_items: &HashMap<String, BTreeSet<String>>, top_n: usize) -> Vec<ItemPair> {
    // BTreeSet iteration is sorted, so (first, second) is already the
    // canonical orientation for every pair.
    let mut pair_counts: HashMap<(String, String), u64> = HashMap::new();
    for items in order_items.values() {
        let items: Vec<&String> = items.iter().collect();
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                *pair_counts
                    .entry((items[i].clone(), items[j].clone()))
                    .or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<((String, String), u64)> = pair_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .map(|((item1, item2), count)| ItemPair {
            item1,
            item2,
            count,
        })
        .collect()
}

fn rank_trending(
    date_items: &BTreeMap<String, HashMap<String, u64>>,
    top_n: usize,
) -> Vec<TrendingItem> {
    let dates: Vec<&String> = date_items.keys().collect();
    let recent_start = dates.len().saturating_sub(TREND_WINDOW_DAYS);
    let older_start = dates.len().saturating_sub(TREND_WINDOW_DAYS * 2);

    let mut recent_counts: HashMap<&str, u64> = HashMap::new();
    for date in &dates[recent_start..] {
        for (item, count) in &date_items[*date] {
            *recent_counts.entry(item.as_str()).or_insert(0) += *count;
        }
    }

    let mut older_counts: HashMap<&str, u64> = HashMap::new();
    for date in &dates[older_start..recent_start] {
        for (item, count) in &date_items[*date] {
            *older_counts.entry(item.as_str()).or_insert(0) += *count;
        }
    }

    // Items with no recent activity are absent: trending reports recent
    // movers only, never lifetime volume.
    let mut ranked: Vec<TrendingItem> = recent_counts
        .into_iter()
        .map(|(item, recent)| {
            let older = older_counts.get(item).copied().unwrap_or(0);
            let trend = if older == 0 {
                recent as f64
            } else {
                (recent as f64 - older as f64) / older as f64
            };
            TrendingItem {
                item: item.to_string(),
                recent_count: recent,
                trend,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.trend
            .total_cmp(&a.trend)
            .then_with(|| a.item.cmp(&b.item))
    });
    ranked.truncate(top_n);
    ranked
}
