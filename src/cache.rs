//! Set-associative, multi-level cache simulator.
//!
//! Grounded in `cache/cache.c`: three fixed levels (L1/L2/L3), each a
//! fixed-size array of sets, each set a fixed-length array of lines.
//! Address decoding, hit/miss/eviction bookkeeping and the
//! inclusive-agnostic controller protocol all follow §4.6 directly.

pub const L1_LATENCY: u64 = 1;
pub const L2_LATENCY: u64 = 5;
pub const L3_LATENCY: u64 = 20;
pub const RAM_LATENCY: u64 = 100;

/// Line replacement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Lru,
    Fifo,
}

/// Outcome of probing one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, Default)]
struct Line {
    tag: u64,
    valid: bool,
    dirty: bool,
    insertion_time: u64,
    lru_time: u64,
}

/// Static configuration for one cache level.
#[derive(Debug, Clone, Copy)]
pub struct LevelConfig {
    pub size: usize,
    pub block_size: usize,
    pub associativity: usize,
    pub policy: Policy,
}

impl LevelConfig {
    fn num_sets(&self) -> usize {
        self.size / (self.block_size * self.associativity)
    }
}

/// One level of the cache hierarchy: a fixed array of sets plus its own
/// hit/miss counters and logical clock.
#[derive(Debug)]
pub struct Level {
    config: LevelConfig,
    sets: Vec<Vec<Line>>,
    pub hits: u64,
    pub misses: u64,
    global_time: u64,
}

impl Level {
    pub fn new(config: LevelConfig) -> Self {
        let num_sets = config.num_sets();
        let sets = vec![vec![Line::default(); config.associativity]; num_sets];
        Self {
            config,
            sets,
            hits: 0,
            misses: 0,
            global_time: 0,
        }
    }

    pub fn config(&self) -> LevelConfig {
        self.config
    }

    fn decode(&self, address: u64) -> (usize, u64) {
        let block_addr = address / self.config.block_size as u64;
        let num_sets = self.sets.len() as u64;
        let set_index = (block_addr % num_sets) as usize;
        let tag = block_addr / num_sets;
        (set_index, tag)
    }

    /// Probes this level for `address`, updating hit/miss counters and
    /// line state. Returns `Hit` or `Miss` per §4.6's per-access protocol.
    pub fn access(&mut self, address: u64, is_write: bool) -> Outcome {
        self.global_time += 1;
        let now = self.global_time;
        let (set_index, tag) = self.decode(address);
        let set = &mut self.sets[set_index];

        for line in set.iter_mut() {
            if line.valid && line.tag == tag {
                self.hits += 1;
                if self.config.policy == Policy::Lru {
                    line.lru_time = now;
                }
                if is_write {
                    line.dirty = true;
                }
                return Outcome::Hit;
            }
        }

        self.misses += 1;

        if let Some(line) = set.iter_mut().find(|l| !l.valid) {
            line.valid = true;
            line.tag = tag;
            line.dirty = is_write;
            line.insertion_time = now;
            line.lru_time = now;
            return Outcome::Miss;
        }

        let victim = set
            .iter()
            .enumerate()
            .min_by_key(|(i, l)| {
                let t = match self.config.policy {
                    Policy::Fifo => l.insertion_time,
                    Policy::Lru => l.lru_time,
                };
                (t, *i)
            })
            .map(|(i, _)| i)
            .expect("associativity is always > 0");

        let line = &mut set[victim];
        line.tag = tag;
        line.dirty = is_write;
        line.insertion_time = now;
        line.lru_time = now;

        Outcome::Miss
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            100.0 * self.hits as f64 / total as f64
        }
    }
}

impl Default for LevelConfig {
    /// Not meaningful on its own — levels are built via
    /// `Controller::new` with the §4.6 default table.
    fn default() -> Self {
        Self {
            size: 1024,
            block_size: 64,
            associativity: 2,
            policy: Policy::Lru,
        }
    }
}

/// Owns L1/L2/L3 and accumulates total requests/cycles across accesses.
#[derive(Debug)]
pub struct Controller {
    pub l1: Level,
    pub l2: Level,
    pub l3: Level,
    pub total_requests: u64,
    pub total_cycles: u64,
}

impl Controller {
    /// Builds the default three-level hierarchy from §4.6's table.
    pub fn new() -> Self {
        Self::with_configs(
            LevelConfig {
                size: 1024,
                block_size: 64,
                associativity: 2,
                policy: Policy::Lru,
            },
            LevelConfig {
                size: 4096,
                block_size: 64,
                associativity: 4,
                policy: Policy::Lru,
            },
            LevelConfig {
                size: 16384,
                block_size: 64,
                associativity: 8,
                policy: Policy::Fifo,
            },
        )
    }

    pub fn with_configs(l1: LevelConfig, l2: LevelConfig, l3: LevelConfig) -> Self {
        Self {
            l1: Level::new(l1),
            l2: Level::new(l2),
            l3: Level::new(l3),
            total_requests: 0,
            total_cycles: 0,
        }
    }

    /// Simulates one CPU access, probing L1 then L2 then L3 on successive
    /// misses, adding `RAM_LATENCY` if all three miss. Levels below the
    /// one that hits are never touched (no back-install).
    pub fn access(&mut self, address: u64, is_write: bool) -> u64 {
        self.total_requests += 1;

        let mut cost = L1_LATENCY;
        if self.l1.access(address, is_write) == Outcome::Hit {
            self.total_cycles += cost;
            return cost;
        }

        cost += L2_LATENCY;
        if self.l2.access(address, is_write) == Outcome::Hit {
            self.total_cycles += cost;
            return cost;
        }

        cost += L3_LATENCY;
        if self.l3.access(address, is_write) == Outcome::Hit {
            self.total_cycles += cost;
            return cost;
        }

        cost += RAM_LATENCY;
        self.total_cycles += cost;
        cost
    }

    /// `total_cycles / total_requests`, or `0.0` with no requests yet.
    pub fn amat(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_cycles as f64 / self.total_requests as f64
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
