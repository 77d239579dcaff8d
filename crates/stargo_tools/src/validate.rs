//! Catalog validation.
//!
//! The building, defense, ship and research catalogs are compiled in. This
//! checks they are internally consistent: the research graph is acyclic,
//! every ship gate names reachable research, and every cost, time and
//! strength is positive.

use stargo_core::buildings::BuildingType;
use stargo_core::defenses::DefenseType;
use stargo_core::error::{GameError, Result};
use stargo_core::math::Fixed;
use stargo_core::research::{topological_order, ResearchType};
use stargo_core::resources::{ResourceType, Resources};
use stargo_core::ships::ShipType;
use thiserror::Error;

/// A single catalog inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogProblem {
    /// The prerequisite graph could not be ordered.
    #[error("research graph: {0}")]
    ResearchGraph(String),

    /// The topological order is missing an entry.
    #[error("research {0} missing from prerequisite order")]
    ResearchUnordered(ResearchType),

    /// A ship requires research the order never reaches.
    #[error("{ship} requires unreachable research {research}")]
    UnreachableShipGate {
        /// Ship class.
        ship: ShipType,
        /// Required research.
        research: ResearchType,
    },

    /// A cost has a negative field or is entirely zero.
    #[error("{0}: cost must be non-negative and non-zero")]
    BadCost(String),

    /// A duration or strength is not positive.
    #[error("{0}: value must be positive")]
    NotPositive(String),
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of checks performed.
    pub checks: usize,
    /// Problems found.
    pub problems: Vec<CatalogProblem>,
}

impl ValidationReport {
    fn check(&mut self, ok: bool, problem: impl FnOnce() -> CatalogProblem) {
        self.checks += 1;
        if !ok {
            self.problems.push(problem());
        }
    }

    /// Whether every check passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Convert into a result, joining all problems into one error.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidCatalog`] if any check failed.
    pub fn into_result(self) -> Result<usize> {
        if self.is_valid() {
            return Ok(self.checks);
        }
        let message = self
            .problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(GameError::InvalidCatalog(message))
    }
}

fn valid_cost(cost: &Resources) -> bool {
    let fields = ResourceType::ALL.map(|resource| cost.get(resource));
    fields.iter().all(|&v| v >= Fixed::ZERO) && fields.iter().any(|&v| v > Fixed::ZERO)
}

/// Run every catalog check.
#[must_use]
pub fn validate_catalogs() -> ValidationReport {
    let mut report = ValidationReport::default();

    let order = match topological_order() {
        Ok(order) => order,
        Err(e) => {
            report.check(false, || CatalogProblem::ResearchGraph(e.to_string()));
            Vec::new()
        }
    };

    for research in ResearchType::ALL {
        report.check(order.contains(&research), || {
            CatalogProblem::ResearchUnordered(research)
        });
        report.check(valid_cost(&research.cost()), || {
            CatalogProblem::BadCost(format!("research {research}"))
        });
        report.check(research.research_time() > 0, || {
            CatalogProblem::NotPositive(format!("research {research} time"))
        });
    }

    for ship in ShipType::ALL {
        for &research in ship.required_research() {
            report.check(order.contains(&research), || {
                CatalogProblem::UnreachableShipGate { ship, research }
            });
        }
        report.check(valid_cost(&ship.build_cost()), || {
            CatalogProblem::BadCost(format!("ship {ship}"))
        });
        report.check(ship.build_time() > 0, || {
            CatalogProblem::NotPositive(format!("ship {ship} build time"))
        });
        report.check(
            ship.attack_power() > Fixed::ZERO && ship.shield_strength() > Fixed::ZERO,
            || CatalogProblem::NotPositive(format!("ship {ship} strength")),
        );
    }

    for building in BuildingType::ALL {
        report.check(valid_cost(&building.build_cost()), || {
            CatalogProblem::BadCost(format!("building {building}"))
        });
        report.check(building.build_time() > 0, || {
            CatalogProblem::NotPositive(format!("building {building} build time"))
        });
    }

    for defense in DefenseType::ALL {
        report.check(valid_cost(&defense.build_cost()), || {
            CatalogProblem::BadCost(format!("defense {defense}"))
        });
        report.check(defense.build_ticks() > 0, || {
            CatalogProblem::NotPositive(format!("defense {defense} build time"))
        });
        report.check(
            defense.max_health() > Fixed::ZERO
                && defense.shield_strength() > Fixed::ZERO
                && defense.weapon_power() > Fixed::ZERO,
            || CatalogProblem::NotPositive(format!("defense {defense} strength")),
        );
    }

    tracing::debug!(
        checks = report.checks,
        problems = report.problems.len(),
        "Catalog validation finished"
    );
    report
}
