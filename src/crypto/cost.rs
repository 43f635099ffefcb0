use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{KeydgenError, Result};

/// Work factors applied to every block the seeder derives.
///
/// `rounds` drives both PBKDF2 stages, the remaining three configure Argon2id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParams {
    rounds: u32,
    time_cost: u32,
    mem_cost_kib: u32,
    parallelism: u32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            // pbkdf2 iterations per stage
            rounds: 1000,
            // argon2 passes
            time_cost: 3,
            mem_cost_kib: 16 * 1024, // 16 MiB
            parallelism: 1,
        }
    }
}

impl CostParams {
    pub fn new(rounds: u32, time_cost: u32, mem_cost_kib: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            rounds,
            time_cost,
            mem_cost_kib,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounds < 1 {
            return Err(KeydgenError::InvalidCost("rounds > 0"));
        }
        if self.time_cost < 1 {
            return Err(KeydgenError::InvalidCost("time > 0"));
        }
        if self.parallelism < 1 {
            return Err(KeydgenError::InvalidCost("parallelism > 0"));
        }
        if self.parallelism > Params::MAX_P_COST {
            return Err(KeydgenError::InvalidCost("parallelism < 2^24"));
        }
        // parallelism is bounded above, so this cannot overflow
        if self.mem_cost_kib < Params::MIN_M_COST.max(8 * self.parallelism) {
            return Err(KeydgenError::InvalidCost("memory >= 8 KiB per lane"));
        }
        self.params()?;
        Ok(())
    }

    fn params(&self) -> Result<Params> {
        Params::new(self.mem_cost_kib, self.time_cost, self.parallelism, None).map_err(|err| {
            match err {
                argon2::Error::MemoryTooLittle | argon2::Error::MemoryTooMuch => {
                    KeydgenError::InvalidCost("memory >= 8 KiB per lane")
                }
                argon2::Error::TimeTooSmall => KeydgenError::InvalidCost("time > 0"),
                argon2::Error::ThreadsTooFew | argon2::Error::ThreadsTooMany => {
                    KeydgenError::InvalidCost("parallelism < 2^24")
                }
                other => KeydgenError::Argon2(other),
            }
        })
    }

    pub(crate) fn argon2(&self) -> Result<Argon2<'static>> {
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params()?))
    }
}
