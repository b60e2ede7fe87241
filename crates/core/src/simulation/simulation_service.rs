use log::info;
use std::sync::Arc;

use super::simulation_model::SimulationDate;
use super::simulation_traits::{SimulationRepositoryTrait, SimulationServiceTrait};
use crate::constants::SYSTEM_USER;
use crate::errors::Result;
use crate::utils::time_utils::{next_business_day, roll_forward_to_business_day, Clock};

pub struct SimulationService {
    repository: Arc<dyn SimulationRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl SimulationService {
    pub fn new(repository: Arc<dyn SimulationRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn fresh(&self, acting_user: &str) -> SimulationDate {
        SimulationDate::initial(
            roll_forward_to_business_day(self.clock.local_date()),
            acting_user,
            self.clock.now_naive(),
        )
    }
}

impl SimulationServiceTrait for SimulationService {
    fn current(&self) -> Result<SimulationDate> {
        if let Some(stored) = self.repository.get()? {
            return Ok(stored);
        }
        let initial = self.fresh(SYSTEM_USER);
        info!("Initializing simulation date at {}", initial.current_date);
        self.repository.save(initial, None)
    }

    fn advance(&self, acting_user: &str) -> Result<SimulationDate> {
        let current = self.current()?;
        let next_date = next_business_day(current.current_date);
        let next = SimulationDate {
            current_date: next_date,
            days_advanced: current.days_advanced + 1,
            updated_by: acting_user.to_string(),
            last_updated_at: self.clock.now_naive(),
            description: Some(format!(
                "Advanced from {} to {}",
                current.current_date, next_date
            )),
            ..current.clone()
        };
        let saved = self.repository.save(next, Some(current.version))?;
        info!(
            "Simulation date advanced to {} by {} (day {})",
            saved.current_date, acting_user, saved.days_advanced
        );
        Ok(saved)
    }

    fn reset(&self, acting_user: &str) -> Result<SimulationDate> {
        let expected = self.repository.get()?.map(|s| s.version);
        let mut fresh = self.fresh(acting_user);
        fresh.description = Some("Simulation reset".to_string());
        let saved = self.repository.save(fresh, expected)?;
        info!("Simulation reset to {} by {}", saved.current_date, acting_user);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::InMemoryStore;
    use crate::utils::time_utils::FixedClock;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_first_use_starts_on_next_weekday() {
        // Saturday -> Monday
        let clock = Arc::new(FixedClock::at(d(2024, 3, 2), 9));
        let service = SimulationService::new(InMemoryStore::new(), clock);

        let current = service.current().unwrap();
        assert_eq!(current.current_date, d(2024, 3, 4));
        assert_eq!(current.initial_date, d(2024, 3, 4));
        assert_eq!(current.version, 1);
        // stable across calls
        assert_eq!(service.current().unwrap(), current);
    }

    #[test]
    fn test_advance_skips_weekend_and_bumps_version() {
        let clock = Arc::new(FixedClock::at(d(2024, 3, 7), 9));
        let service = SimulationService::new(InMemoryStore::new(), clock);

        // Thursday
        assert_eq!(service.current_date().unwrap(), d(2024, 3, 7));
        service.advance("ops").unwrap();
        let after = service.advance("ops").unwrap();

        assert_eq!(after.current_date, d(2024, 3, 11));
        assert_eq!(after.days_advanced, 2);
        assert_eq!(after.version, 3);
        assert_eq!(after.updated_by, "ops");
        assert_eq!(after.initial_date, d(2024, 3, 7));
    }

    #[test]
    fn test_reset_returns_to_start() {
        let clock = Arc::new(FixedClock::at(d(2024, 3, 7), 9));
        let service = SimulationService::new(InMemoryStore::new(), clock);
        service.advance("ops").unwrap();

        let reset = service.reset("admin").unwrap();
        assert_eq!(reset.current_date, d(2024, 3, 7));
        assert_eq!(reset.days_advanced, 0);
        assert_eq!(reset.updated_by, "admin");
    }
}
