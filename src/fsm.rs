use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::FsmError;

/// Anything usable as a state identity.
pub trait StateId: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> StateId for T {}

/// Condition hook. Takes a shared borrow so it cannot mutate the context.
pub type Condition<C> = fn(&C) -> bool;

/// Action / enter / exit / frame-update hook.
pub type Hook<C> = fn(&mut C);

/// One node of a [`StateMachine`]: identity, a condition that gates entry,
/// an action run on every physics step, optional lifecycle hooks and the
/// ordered list of states it may transition into.
///
/// `C` is the context the hooks operate on. The machine never owns it; the
/// caller passes it into [`StateMachine::evaluate_transitions`] and
/// [`StateMachine::run_action`].
pub struct State<S, C> {
    pub id: S,
    pub name: &'static str,
    condition: Condition<C>,
    action: Hook<C>,
    on_enter: Option<Hook<C>>,
    on_exit: Option<Hook<C>>,
    on_frame_update: Option<Hook<C>>,
    transitions: Vec<S>,
}

impl<S: StateId, C> State<S, C> {
    pub fn new(id: S, name: &'static str, condition: Condition<C>, action: Hook<C>) -> Self {
        Self {
            id,
            name,
            condition,
            action,
            on_enter: None,
            on_exit: None,
            on_frame_update: None,
            transitions: Vec::new(),
        }
    }

    pub fn on_enter(mut self, hook: Hook<C>) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn on_exit(mut self, hook: Hook<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }

    pub fn on_frame_update(mut self, hook: Hook<C>) -> Self {
        self.on_frame_update = Some(hook);
        self
    }

    /// Candidate targets, scanned in the order given. The first one whose
    /// condition holds wins. A state may list itself: a self match ends the
    /// scan without firing any hooks.
    pub fn transitions(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.transitions = targets.into_iter().collect();
        self
    }

    pub fn allowed_transitions(&self) -> &[S] {
        &self.transitions
    }
}

/// A transition that fired during [`StateMachine::evaluate_transitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
}

/// Table-driven finite state machine with two clocks.
///
/// - [`evaluate_transitions`](Self::evaluate_transitions) runs once per frame:
///   it scans the current state's candidates, fires exit/enter on a change and
///   then the frame-update hook of whatever state is current.
/// - [`run_action`](Self::run_action) runs once per fixed physics step and only
///   calls the current state's action.
///
/// The two may be called at any ratio. The table is validated once in
/// [`StateMachine::new`]; afterwards every id is resolved to an index so
/// evaluation never looks anything up by id.
pub struct StateMachine<S, C> {
    states: Vec<State<S, C>>,
    /// Candidate indices per state, resolved from `State::transitions`.
    edges: Vec<Vec<usize>>,
    index: HashMap<S, usize>,
    idle: usize,
    current: usize,
    previous: usize,
    entered_this_frame: bool,
    steps_in_state: u32,
}

impl<S: StateId, C> StateMachine<S, C> {
    /// Register `states` and start in `idle`.
    ///
    /// Fails if `idle` is not among `states`, an id is registered twice, or a
    /// transition list names an unregistered id. The idle state's enter hook
    /// is not run; `just_entered()` is `true` until the first evaluation.
    pub fn new(
        idle: S,
        states: impl IntoIterator<Item = State<S, C>>,
    ) -> Result<Self, FsmError> {
        let states: Vec<State<S, C>> = states.into_iter().collect();

        let mut index = HashMap::with_capacity(states.len());
        for (i, state) in states.iter().enumerate() {
            if index.insert(state.id, i).is_some() {
                return Err(FsmError::DuplicateState(format!("{:?}", state.id)));
            }
        }

        let idle_index = *index
            .get(&idle)
            .ok_or_else(|| FsmError::MissingIdle(format!("{:?}", idle)))?;

        let mut edges = Vec::with_capacity(states.len());
        for state in &states {
            let resolved = state
                .transitions
                .iter()
                .map(|target| {
                    index.get(target).copied().ok_or_else(|| FsmError::UnknownTarget {
                        from: format!("{:?}", state.id),
                        to: format!("{:?}", target),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            edges.push(resolved);
        }

        Ok(Self {
            states,
            edges,
            index,
            idle: idle_index,
            current: idle_index,
            previous: idle_index,
            entered_this_frame: true,
            steps_in_state: 0,
        })
    }

    /// Frame clock. Returns the transition that fired, if any.
    pub fn evaluate_transitions(&mut self, ctx: &mut C) -> Option<Transition<S>> {
        self.entered_this_frame = false;

        let from = self.current;
        let view: &C = ctx;
        let target = self.edges[from]
            .iter()
            .copied()
            .find(|&candidate| (self.states[candidate].condition)(view));

        let fired = match target {
            Some(to) if to != from => {
                if let Some(exit) = self.states[from].on_exit {
                    exit(ctx);
                }
                self.previous = from;
                self.current = to;
                self.entered_this_frame = true;
                self.steps_in_state = 0;
                if let Some(enter) = self.states[to].on_enter {
                    enter(ctx);
                }
                Some(Transition {
                    from: self.states[from].id,
                    to: self.states[to].id,
                })
            }
            // No candidate, or the state matched itself.
            _ => None,
        };

        if let Some(update) = self.states[self.current].on_frame_update {
            update(ctx);
        }

        fired
    }

    /// Physics clock. Runs the current state's action unconditionally.
    pub fn run_action(&mut self, ctx: &mut C) {
        (self.states[self.current].action)(ctx);
        self.steps_in_state = self.steps_in_state.saturating_add(1);
    }

    pub fn current(&self) -> S {
        self.states[self.current].id
    }

    pub fn current_name(&self) -> &'static str {
        self.states[self.current].name
    }

    pub fn previous(&self) -> S {
        self.states[self.previous].id
    }

    pub fn idle(&self) -> S {
        self.states[self.idle].id
    }

    /// `true` only on the frame a transition fired (and before the first
    /// evaluation).
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }

    /// Physics steps run since the current state was entered.
    pub fn steps_in_state(&self) -> u32 {
        self.steps_in_state
    }

    pub fn state(&self, id: S) -> Option<&State<S, C>> {
        self.index.get(&id).map(|&i| &self.states[i])
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Light {
        Off,
        Dim,
        Bright,
    }

    #[derive(Default)]
    struct Panel {
        dial: u8,
        log: Vec<&'static str>,
        actions: u32,
    }

    fn table() -> Vec<State<Light, Panel>> {
        vec![
            State::new(Light::Off, "Off", |p: &Panel| p.dial == 0, |p: &mut Panel| p.actions += 1)
                .on_exit(|p| p.log.push("exit Off"))
                .transitions([Light::Dim, Light::Bright]),
            State::new(Light::Dim, "Dim", |p: &Panel| p.dial >= 1, |p: &mut Panel| p.actions += 10)
                .on_enter(|p| p.log.push("enter Dim"))
                .on_exit(|p| p.log.push("exit Dim"))
                .on_frame_update(|p| p.log.push("update Dim"))
                .transitions([Light::Off, Light::Bright]),
            State::new(Light::Bright, "Bright", |p: &Panel| p.dial >= 2, |_: &mut Panel| {})
                .on_enter(|p| p.log.push("enter Bright"))
                .on_exit(|p| p.log.push("exit Bright"))
                .transitions([Light::Off, Light::Dim]),
        ]
    }

    #[test]
    fn starts_in_idle() {
        let fsm = StateMachine::new(Light::Off, table()).unwrap();
        assert_eq!(fsm.current(), Light::Off);
        assert_eq!(fsm.idle(), Light::Off);
        assert!(fsm.just_entered());
        assert_eq!(fsm.len(), 3);
    }

    #[test]
    fn first_match_in_declaration_order_wins() {
        let mut fsm = StateMachine::new(Light::Off, table()).unwrap();
        // Both Dim and Bright hold; Dim is declared first.
        let mut panel = Panel { dial: 2, ..Default::default() };
        let fired = fsm.evaluate_transitions(&mut panel);
        assert_eq!(fired, Some(Transition { from: Light::Off, to: Light::Dim }));
        assert_eq!(panel.log, ["exit Off", "enter Dim", "update Dim"]);
    }

    #[test]
    fn no_matching_candidate_keeps_current_state() {
        let mut fsm = StateMachine::new(Light::Off, table()).unwrap();
        let mut panel = Panel::default();
        assert_eq!(fsm.evaluate_transitions(&mut panel), None);
        assert_eq!(fsm.current(), Light::Off);
        assert!(panel.log.is_empty());
        assert!(!fsm.just_entered());
    }

    #[test]
    fn frame_update_runs_once_per_evaluation_without_transition() {
        let mut fsm = StateMachine::new(Light::Off, table()).unwrap();
        let mut panel = Panel { dial: 1, ..Default::default() };
        fsm.evaluate_transitions(&mut panel);
        panel.log.clear();

        // Dial 1: Off fails, Bright fails, Dim is not its own candidate.
        fsm.evaluate_transitions(&mut panel);
        assert_eq!(panel.log, ["update Dim"]);
        assert_eq!(fsm.current(), Light::Dim);
    }

    #[test]
    fn self_listed_state_holds_ahead_of_later_candidates() {
        let states = vec![
            State::new(Light::Off, "Off", |p: &Panel| p.dial == 0, |_: &mut Panel| {})
                .transitions([Light::Dim]),
            State::new(Light::Dim, "Dim", |p: &Panel| p.dial >= 1, |_: &mut Panel| {})
                .on_enter(|p| p.log.push("enter Dim"))
                .transitions([Light::Dim, Light::Bright]),
            State::new(Light::Bright, "Bright", |p: &Panel| p.dial >= 1, |_: &mut Panel| {})
                .transitions([Light::Off]),
        ];
        let mut fsm = StateMachine::new(Light::Off, states).unwrap();
        let mut panel = Panel { dial: 1, ..Default::default() };
        fsm.evaluate_transitions(&mut panel);
        fsm.evaluate_transitions(&mut panel);
        assert_eq!(fsm.current(), Light::Dim);
        assert_eq!(panel.log, ["enter Dim"]);
    }

    #[test]
    fn exit_and_enter_fire_once_per_transition() {
        let mut fsm = StateMachine::new(Light::Off, table()).unwrap();
        let mut panel = Panel::default();
        for dial in [1, 1, 0, 2, 2, 1, 0, 0] {
            panel.dial = dial;
            fsm.evaluate_transitions(&mut panel);
        }
        let lifecycle: Vec<_> = panel
            .log
            .iter()
            .copied()
            .filter(|l| !l.starts_with("update"))
            .collect();
        assert_eq!(
            lifecycle,
            [
                "exit Off", "enter Dim",
                "exit Dim",
                "exit Off", "enter Dim",
                "exit Dim", "enter Bright",
                "exit Bright", "enter Dim",
                "exit Dim",
            ]
        );
    }

    #[test]
    fn run_action_only_touches_current_state() {
        let mut fsm = StateMachine::new(Light::Off, table()).unwrap();
        let mut panel = Panel::default();
        fsm.run_action(&mut panel);
        fsm.run_action(&mut panel);
        assert_eq!(panel.actions, 2);
        assert_eq!(fsm.steps_in_state(), 2);

        panel.dial = 1;
        fsm.evaluate_transitions(&mut panel);
        assert_eq!(fsm.steps_in_state(), 0);
        fsm.run_action(&mut panel);
        assert_eq!(panel.actions, 12);
        assert_eq!(fsm.previous(), Light::Off);
    }

    #[test]
    fn same_inputs_select_same_target() {
        let mut a = StateMachine::new(Light::Off, table()).unwrap();
        let mut b = StateMachine::new(Light::Off, table()).unwrap();
        let mut pa = Panel::default();
        let mut pb = Panel::default();
        for dial in [0, 2, 1, 2, 0, 1] {
            pa.dial = dial;
            pb.dial = dial;
            assert_eq!(a.evaluate_transitions(&mut pa), b.evaluate_transitions(&mut pb));
        }
    }

    #[test]
    fn rejects_unknown_target() {
        let states = vec![
            State::new(Light::Off, "Off", |_: &Panel| true, |_: &mut Panel| {})
                .transitions([Light::Bright]),
        ];
        let err = StateMachine::new(Light::Off, states).err().unwrap();
        assert_eq!(
            err,
            FsmError::UnknownTarget { from: "Off".into(), to: "Bright".into() }
        );
    }

    #[test]
    fn rejects_missing_idle() {
        let states = vec![State::new(Light::Dim, "Dim", |_: &Panel| true, |_: &mut Panel| {})];
        let err = StateMachine::new(Light::Off, states).err().unwrap();
        assert_eq!(err, FsmError::MissingIdle("Off".into()));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let states = vec![
            State::new(Light::Off, "Off", |_: &Panel| true, |_: &mut Panel| {}),
            State::new(Light::Off, "Off again", |_: &Panel| true, |_: &mut Panel| {}),
        ];
        let err = StateMachine::new(Light::Off, states).err().unwrap();
        assert_eq!(err, FsmError::DuplicateState("Off".into()));
    }
}
