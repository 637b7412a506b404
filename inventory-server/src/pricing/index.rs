//! Discount lookup for one pricing pass
//!
//! Loads the discounts active on a given day together with their links, so a
//! whole listing can be priced without a query per row.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use shared::models::{Component, Discount, PriceQuote, Server};
use sqlx::SqlitePool;

use super::calculator::quote;
use crate::db::repository::{RepoResult, discount, server};

#[derive(Debug, Clone)]
pub struct DiscountIndex {
    today: NaiveDate,
    /// Server discounts also apply to the server's components
    cascade: bool,
    /// Active discounts by id
    discounts: HashMap<i64, Discount>,
    by_component: HashMap<i64, Vec<i64>>,
    by_server: HashMap<i64, Vec<i64>>,
    servers_by_component: HashMap<i64, Vec<i64>>,
}

impl DiscountIndex {
    /// Build from already loaded rows; links to inactive discounts are dropped
    pub fn new(
        today: NaiveDate,
        cascade: bool,
        active: Vec<Discount>,
        component_links: Vec<(i64, i64)>,
        server_links: Vec<(i64, i64)>,
        composition: Vec<(i64, i64)>,
    ) -> Self {
        let discounts: HashMap<i64, Discount> = active
            .into_iter()
            .filter(|d| super::is_active(d, today))
            .map(|d| (d.id, d))
            .collect();

        let mut by_component: HashMap<i64, Vec<i64>> = HashMap::new();
        for (discount_id, component_id) in component_links {
            if discounts.contains_key(&discount_id) {
                by_component.entry(component_id).or_default().push(discount_id);
            }
        }

        let mut by_server: HashMap<i64, Vec<i64>> = HashMap::new();
        for (discount_id, server_id) in server_links {
            if discounts.contains_key(&discount_id) {
                by_server.entry(server_id).or_default().push(discount_id);
            }
        }

        let mut servers_by_component: HashMap<i64, Vec<i64>> = HashMap::new();
        if cascade {
            for (server_id, component_id) in composition {
                servers_by_component
                    .entry(component_id)
                    .or_default()
                    .push(server_id);
            }
        }

        Self {
            today,
            cascade,
            discounts,
            by_component,
            by_server,
            servers_by_component,
        }
    }

    /// Load everything needed to price items on `today`
    pub async fn load(pool: &SqlitePool, today: NaiveDate, cascade: bool) -> RepoResult<Self> {
        let active = discount::active_on(pool, today).await?;
        if active.is_empty() {
            return Ok(Self::new(today, cascade, active, vec![], vec![], vec![]));
        }

        let component_links = discount::component_links(pool).await?;
        let server_links = discount::server_links(pool).await?;
        let composition = if cascade {
            server::composition(pool).await?
        } else {
            Vec::new()
        };

        Ok(Self::new(
            today,
            cascade,
            active,
            component_links,
            server_links,
            composition,
        ))
    }

    fn gather<'a>(
        &'a self,
        ids: impl IntoIterator<Item = &'a i64>,
        into: &mut BTreeMap<i64, &'a Discount>,
    ) {
        for id in ids {
            if let Some(d) = self.discounts.get(id) {
                into.insert(*id, d);
            }
        }
    }

    /// Active discounts that may apply to a component, each once
    pub fn component_candidates(&self, component_id: i64) -> Vec<&Discount> {
        let mut found = BTreeMap::new();
        if let Some(ids) = self.by_component.get(&component_id) {
            self.gather(ids, &mut found);
        }
        if self.cascade
            && let Some(servers) = self.servers_by_component.get(&component_id)
        {
            for server_id in servers {
                if let Some(ids) = self.by_server.get(server_id) {
                    self.gather(ids, &mut found);
                }
            }
        }
        found.into_values().collect()
    }

    /// Active discounts attached directly to a server
    pub fn server_candidates(&self, server_id: i64) -> Vec<&Discount> {
        let mut found = BTreeMap::new();
        if let Some(ids) = self.by_server.get(&server_id) {
            self.gather(ids, &mut found);
        }
        found.into_values().collect()
    }

    pub fn component_quote(&self, component: &Component) -> PriceQuote {
        quote(
            component.price,
            self.component_candidates(component.id),
            self.today,
        )
    }

    pub fn server_quote(&self, server: &Server) -> PriceQuote {
        quote(server.price, self.server_candidates(server.id), self.today)
    }
}
