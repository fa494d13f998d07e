use crate::config::EngineConfig;
use crate::domain::drink::Drink;
use crate::domain::history::{CostTable, Inventory};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfitPolicy {
    pub min_margin: f64,
    pub min_stock: u32,
}

impl Default for ProfitPolicy {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for ProfitPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self { min_margin: config.min_profit_margin, min_stock: config.min_stock }
    }
}

/// `(price - cost) / price`, or `None` when the cost is unknown, zero,
/// negative or not a number.
pub fn profit_margin(drink: &Drink, costs: &CostTable) -> Option<f64> {
    let cost = costs.get(drink.name()).copied().filter(|cost| cost.is_finite() && *cost > 0.0)?;
    Some((drink.price() - cost) / drink.price())
}

/// Drops low-stock and low-margin drinks, then sorts by margin, highest first.
pub fn optimize_profit<'a>(
    candidates: &[&'a Drink],
    costs: &CostTable,
    inventory: &Inventory,
    policy: ProfitPolicy,
) -> Vec<&'a Drink> {
    let mut profitable: Vec<(&'a Drink, f64)> = candidates
        .iter()
        .copied()
        .filter(|drink| inventory.get(drink.name()).copied().unwrap_or(0) >= policy.min_stock)
        .filter_map(|drink| profit_margin(drink, costs).map(|margin| (drink, margin)))
        .filter(|(_, margin)| *margin >= policy.min_margin)
        .collect();

    profitable.sort_by(|a, b| b.1.total_cmp(&a.1));
    profitable.into_iter().map(|(drink, _)| drink).collect()
}

#[cfg(test)]
mod tests {
    use super::{optimize_profit, profit_margin, ProfitPolicy};
    use crate::domain::drink::Drink;
    use crate::domain::history::{CostTable, Inventory};
    use crate::errors::DomainError;

    fn drinks() -> Result<Vec<Drink>, DomainError> {
        Ok(vec![
            Drink::new("Mojito", "cocktail", 12.0, ["minty"], 10.0)?,
            Drink::new("Margarita", "cocktail", 15.0, ["citrus"], 10.0)?,
            Drink::new("Negroni", "cocktail", 24.0, ["bitter"], 10.0)?,
            Drink::new("Spritz", "cocktail", 11.0, ["bitter"], 10.0)?,
            Drink::new("Lager", "beer", 5.0, ["crisp"], 10.0)?,
        ])
    }

    fn tables() -> (CostTable, Inventory) {
        let costs = CostTable::from([
            ("Mojito".to_owned(), 5.0),
            ("Margarita".to_owned(), 2.0),
            ("Negroni".to_owned(), 8.0),
            ("Spritz".to_owned(), 5.0),
            ("Lager".to_owned(), 0.0),
        ]);
        let inventory = Inventory::from([
            ("Mojito".to_owned(), 12),
            ("Margarita".to_owned(), 5),
            ("Negroni".to_owned(), 20),
            ("Spritz".to_owned(), 9),
            ("Lager".to_owned(), 40),
        ]);
        (costs, inventory)
    }

    #[test]
    fn filters_stock_cost_and_margin_then_sorts_by_margin() -> Result<(), DomainError> {
        let drinks = drinks()?;
        let candidates: Vec<&Drink> = drinks.iter().collect();
        let (costs, inventory) = tables();

        let ranked: Vec<&str> =
            optimize_profit(&candidates, &costs, &inventory, ProfitPolicy::default())
                .iter()
                .map(|d| d.name())
                .collect();

        // Negroni margin 0.2 < 0.3, Lager has zero cost.
        assert_eq!(ranked, vec!["Margarita", "Mojito", "Spritz"]);
        Ok(())
    }

    #[test]
    fn drinks_below_min_stock_or_unknown_stock_are_dropped() -> Result<(), DomainError> {
        let drinks = drinks()?;
        let candidates: Vec<&Drink> = drinks.iter().collect();
        let (costs, mut inventory) = tables();
        inventory.insert("Margarita".to_owned(), 4);
        inventory.remove("Mojito");

        let ranked = optimize_profit(&candidates, &costs, &inventory, ProfitPolicy::default());
        assert!(ranked.iter().all(|d| d.name() != "Margarita" && d.name() != "Mojito"));
        Ok(())
    }

    #[test]
    fn output_is_sorted_and_idempotent() -> Result<(), DomainError> {
        let drinks = drinks()?;
        let candidates: Vec<&Drink> = drinks.iter().collect();
        let (costs, inventory) = tables();
        let policy = ProfitPolicy::default();

        let once = optimize_profit(&candidates, &costs, &inventory, policy);
        let twice = optimize_profit(&once, &costs, &inventory, policy);
        assert_eq!(once, twice);

        let margins: Vec<f64> =
            once.iter().filter_map(|drink| profit_margin(drink, &costs)).collect();
        assert!(margins.windows(2).all(|pair| pair[0] >= pair[1]));
        Ok(())
    }

    #[test]
    fn unknown_and_non_positive_costs_have_no_margin() -> Result<(), DomainError> {
        let drink = Drink::new("Mojito", "cocktail", 12.0, ["minty"], 10.0)?;

        assert_eq!(profit_margin(&drink, &CostTable::new()), None);
        assert_eq!(profit_margin(&drink, &CostTable::from([("Mojito".to_owned(), -1.0)])), None);
        assert_eq!(profit_margin(&drink, &CostTable::from([("Mojito".to_owned(), 4.0)])), Some(0.6));
        Ok(())
    }
}
