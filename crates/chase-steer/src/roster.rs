use chase_core::{AgentId, AgentRole};

use crate::{ChaseController, SteeringConfig};

/// Names of the stock party, in toggle order. The first starts under human control.
pub const DEFAULT_AGENT_NAMES: [&str; 3] = ["player", "ally-1", "ally-2"];

#[derive(Debug)]
pub struct RosterEntry<A> {
    pub id: A,
    pub name: String,
    pub controller: ChaseController,
}

/// Ordered set of agents, exactly one of which is human-controlled.
///
/// Each agent owns its own [`ChaseController`], so handing control around never touches
/// another agent's held path or timers.
#[derive(Debug)]
pub struct Roster<A: AgentId> {
    entries: Vec<RosterEntry<A>>,
    active: usize,
}

impl<A: AgentId> Default for Roster<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            active: 0,
        }
    }
}

impl Roster<u32> {
    /// The stock three-agent party, ids `0..3`.
    pub fn default_party(config: SteeringConfig) -> Self {
        let mut roster = Self::default();
        for (id, name) in (0u32..).zip(DEFAULT_AGENT_NAMES) {
            roster.push(id, name, config);
        }
        roster
    }
}

impl<A: AgentId> Roster<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent. Duplicate ids are rejected.
    pub fn push(&mut self, id: A, name: impl Into<String>, config: SteeringConfig) -> bool {
        if self.position(id).is_some() {
            return false;
        }
        self.entries.push(RosterEntry {
            id,
            name: name.into(),
            controller: ChaseController::new(config),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = A> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn entries(&self) -> &[RosterEntry<A>] {
        &self.entries
    }

    /// The human-controlled agent.
    pub fn active(&self) -> Option<A> {
        self.entries.get(self.active).map(|e| e.id)
    }

    pub fn name(&self, id: A) -> Option<&str> {
        self.entry(id).map(|e| e.name.as_str())
    }

    pub fn role(&self, id: A) -> Option<AgentRole> {
        let idx = self.position(id)?;
        Some(if idx == self.active {
            AgentRole::Human
        } else {
            AgentRole::Autonomous
        })
    }

    pub fn controller(&self, id: A) -> Option<&ChaseController> {
        self.entry(id).map(|e| &e.controller)
    }

    pub fn controller_mut(&mut self, id: A) -> Option<&mut ChaseController> {
        let idx = self.position(id)?;
        Some(&mut self.entries[idx].controller)
    }

    /// Every agent not under human control, in roster order.
    pub fn autonomous_mut(&mut self) -> impl Iterator<Item = (A, &mut ChaseController)> + '_ {
        let active = self.active;
        self.entries
            .iter_mut()
            .enumerate()
            .filter(move |(idx, _)| *idx != active)
            .map(|(_, e)| (e.id, &mut e.controller))
    }

    /// Hand control to the next agent in order, wrapping around.
    pub fn toggle(&mut self) -> Option<A> {
        if self.entries.is_empty() {
            return None;
        }
        let next = (self.active + 1) % self.entries.len();
        self.hand_over(next);
        self.active()
    }

    pub fn set_active(&mut self, id: A) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if idx != self.active {
            self.hand_over(idx);
        }
        true
    }

    /// Level restart: control returns to the first agent and every controller starts over.
    pub fn reset(&mut self) {
        self.active = 0;
        for entry in &mut self.entries {
            entry.controller.reset();
        }
        tracing::info!(agents = self.entries.len(), "Roster reset");
    }

    fn hand_over(&mut self, next: usize) {
        let previous = self.active;
        self.active = next;
        // The outgoing human's path (if any) predates its time under input control.
        if let Some(entry) = self.entries.get_mut(previous) {
            entry.controller.reset();
        }
        if let Some(entry) = self.entries.get(next) {
            tracing::info!(
                agent = entry.id.stable_id(),
                name = %entry.name,
                "Control switched"
            );
        }
    }

    fn position(&self, id: A) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn entry(&self, id: A) -> Option<&RosterEntry<A>> {
        self.entries.iter().find(|e| e.id == id)
    }
}
