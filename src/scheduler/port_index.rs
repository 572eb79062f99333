//! Port index: owns the run's ports and answers fit queries.
//!
//! # Algorithm
//!
//! - **Best-fit**: port positions are kept sorted ascending by
//!   `(remaining, id)`. A query binary-searches for the first port whose
//!   remaining capacity covers the demand, O(log P). After every admit or
//!   release the changed port is moved back to its sorted position, O(P).
//! - **First-fit**: positions are sorted once by `(capacity, id)` and scanned
//!   linearly, O(P).
//!
//! # Reference
//! Coffman, Garey & Johnson (1996), "Approximation Algorithms for Bin Packing: A Survey"

use super::config::PortSelection;
use crate::models::Port;

/// Ports of one run, ordered for the configured selection strategy.
#[derive(Debug, Clone)]
pub struct PortIndex {
    ports: Vec<Port>,
    order: Vec<usize>,
    selection: PortSelection,
}

impl PortIndex {
    /// Builds an index over `ports`. Positions returned by the index refer
    /// to the order of this input.
    pub fn new(ports: Vec<Port>, selection: PortSelection) -> Self {
        let mut order: Vec<usize> = (0..ports.len()).collect();
        match selection {
            PortSelection::BestFit => {
                order.sort_by_key(|&p| (ports[p].remaining(), ports[p].id));
            }
            PortSelection::FirstFit => {
                order.sort_by_key(|&p| (ports[p].capacity, ports[p].id));
            }
        }
        Self {
            ports,
            order,
            selection,
        }
    }

    /// The selection strategy.
    pub fn selection(&self) -> PortSelection {
        self.selection
    }

    /// Port at a position.
    #[inline]
    pub fn port(&self, pos: usize) -> &Port {
        &self.ports[pos]
    }

    /// All ports, in input order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Consumes the index, returning the ports in input order.
    pub fn into_ports(self) -> Vec<Port> {
        self.ports
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether there are no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Largest capacity of any port (0 without ports).
    pub fn max_capacity(&self) -> u64 {
        self.ports.iter().map(|p| p.capacity).max().unwrap_or(0)
    }

    /// Finds the port that should take `bandwidth`, if any fits now.
    pub fn find(&self, bandwidth: u64) -> Option<usize> {
        match self.selection {
            PortSelection::BestFit => {
                let i = self
                    .order
                    .partition_point(|&p| self.ports[p].remaining() < bandwidth);
                self.order.get(i).copied()
            }
            PortSelection::FirstFit => self
                .order
                .iter()
                .copied()
                .find(|&p| self.ports[p].fits(bandwidth)),
        }
    }

    /// Reserves `bandwidth` on the port at `pos`.
    ///
    /// Returns `false` (index unchanged) if it does not fit.
    pub fn admit(&mut self, pos: usize, bandwidth: u64) -> bool {
        if !self.ports[pos].try_admit(bandwidth) {
            return false;
        }
        self.reposition(pos);
        true
    }

    /// Returns `bandwidth` to the port at `pos`.
    pub fn release(&mut self, pos: usize, bandwidth: u64) {
        self.ports[pos].release(bandwidth);
        self.reposition(pos);
    }

    fn reposition(&mut self, pos: usize) {
        if self.selection != PortSelection::BestFit {
            return;
        }
        if let Some(at) = self.order.iter().position(|&p| p == pos) {
            self.order.remove(at);
        }
        let key = (self.ports[pos].remaining(), self.ports[pos].id);
        let ports = &self.ports;
        let at = self
            .order
            .partition_point(|&p| (ports[p].remaining(), ports[p].id) < key);
        self.order.insert(at, pos);
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        self.order.windows(2).all(|w| {
            let (a, b) = (&self.ports[w[0]], &self.ports[w[1]]);
            (a.remaining(), a.id) <= (b.remaining(), b.id)
        })
    }
}
