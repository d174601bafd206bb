//! Express lane tagging.

use rand::Rng;
use std::time::Duration;
use timeboost_types::Address;

/// Outcome of tagging one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tagging {
    /// Whether the transaction uses the express lane.
    pub timeboost: bool,
    /// Ordering delay applied by the sequencer.
    pub delay: Duration,
    /// Effective sender.
    pub from: Address,
}

/// Decides which transactions ride the express lane.
///
/// Only the current controller's traffic is fast-pathed. A transaction is
/// express when the round has a controller and the transaction was
/// initiated by it; express transactions have zero delay and are sent from
/// the controller. Everything else keeps its own sender and waits the
/// standard delay.
#[derive(Debug, Clone, Copy)]
pub struct ExpressLaneTagger {
    express_probability: f64,
    standard_delay: Duration,
}

impl ExpressLaneTagger {
    /// Create a new tagger.
    pub fn new(express_probability: f64, standard_delay: Duration) -> Self {
        Self {
            express_probability: express_probability.clamp(0.0, 1.0),
            standard_delay,
        }
    }

    /// Ordering delay for non-express transactions.
    pub fn standard_delay(&self) -> Duration {
        self.standard_delay
    }

    /// Tag a transaction given whether it was initiated by the controller.
    ///
    /// Pure: the same inputs always give the same tagging.
    pub fn decide(
        &self,
        controller: Option<Address>,
        sender: Address,
        controller_initiated: bool,
    ) -> Tagging {
        match controller {
            Some(controller) if controller_initiated => Tagging {
                timeboost: true,
                delay: Duration::ZERO,
                from: controller,
            },
            _ => Tagging {
                timeboost: false,
                delay: self.standard_delay,
                from: sender,
            },
        }
    }

    /// Tag a transaction, drawing whether it was controller-initiated.
    ///
    /// No randomness is consumed while there is no controller.
    pub fn tag(
        &self,
        controller: Option<Address>,
        sender: Address,
        rng: &mut impl Rng,
    ) -> Tagging {
        let controller_initiated =
            controller.is_some() && rng.gen_bool(self.express_probability);
        self.decide(controller, sender, controller_initiated)
    }
}
