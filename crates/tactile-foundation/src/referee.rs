//! Per-dispatch-root arbitration between recognizers.
//!
//! The referee feeds every sample to all attached recognizers, collects the
//! votes they cast and delivers verdicts once the whole round has reported.
//! Verdicts are queued and delivered one at a time; votes cast while handling
//! a verdict join the back of the queue.

use crate::gestures::{
    Ballot, GestureContext, GestureDisposal, GesturePriority, GestureRecognizer, ReconcileError,
    RecognizerKind, RefereeState,
};
use crate::input::{
    AxisAction, AxisSample, FingerId, TargetGeometry, TouchSample, TouchType, Unbounded,
};
use std::collections::VecDeque;
use std::fmt;
use tactile_core::collections::map::HashSet;
use tactile_core::TimerQueue;

/// Handle to a recognizer attached to a [`GestureReferee`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(usize);

impl RecognizerId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefereeError {
    UnknownRecognizer(RecognizerId),
    Reconcile {
        id: RecognizerId,
        source: ReconcileError,
    },
}

impl fmt::Display for RefereeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefereeError::UnknownRecognizer(id) => {
                write!(f, "no recognizer attached with id {}", id.0)
            }
            RefereeError::Reconcile { id, source } => {
                write!(f, "recognizer {} could not be reconciled: {source}", id.0)
            }
        }
    }
}

impl std::error::Error for RefereeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RefereeError::Reconcile { source, .. } => Some(source),
            RefereeError::UnknownRecognizer(_) => None,
        }
    }
}

#[derive(Debug)]
struct Member {
    id: RecognizerId,
    recognizer: RecognizerKind,
}

type Verdicts = VecDeque<(usize, GestureDisposal)>;

/// Arbitrates the recognizers attached under one dispatch root.
///
/// Members are ranked high priority first, then in attachment order. A
/// member whose vote arrives while a non-parallel member ranked ahead of it
/// is still pending is blocked until that member resolves.
pub struct GestureReferee<G = Unbounded> {
    members: Vec<Member>,
    next_id: usize,
    timers: TimerQueue,
    targets: G,
    fingers_down: HashSet<FingerId>,
    axis_active: bool,
}

impl Default for GestureReferee<Unbounded> {
    fn default() -> Self {
        Self::new(Unbounded)
    }
}

impl<G: TargetGeometry> GestureReferee<G> {
    pub fn new(targets: G) -> Self {
        Self {
            members: Vec::new(),
            next_id: 0,
            timers: TimerQueue::new(),
            targets,
            fingers_down: HashSet::default(),
            axis_active: false,
        }
    }

    pub fn targets(&self) -> &G {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut G {
        &mut self.targets
    }

    /// Latest time seen, either from a sample or from [`Self::advance_to`].
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn attach(&mut self, recognizer: impl Into<RecognizerKind>) -> RecognizerId {
        let recognizer = recognizer.into();
        let id = RecognizerId(self.next_id);
        self.next_id += 1;

        let high = recognizer.priority() == GesturePriority::High;
        let position = if high {
            self.members
                .iter()
                .position(|member| member.recognizer.priority() != GesturePriority::High)
                .unwrap_or(self.members.len())
        } else {
            self.members.len()
        };
        log::debug!(
            "attached {:?} recognizer {} at rank {position}",
            recognizer.gesture_type(),
            id.0
        );
        self.members.insert(position, Member { id, recognizer });
        id
    }

    /// Removes a recognizer, force-cleaning it first.
    pub fn detach(&mut self, id: RecognizerId) -> Result<RecognizerKind, RefereeError> {
        let index = self.index_of(id)?;
        let mut member = self.members.remove(index);
        member.recognizer.force_clean_recognizer(&mut self.timers);
        log::debug!("detached recognizer {}", id.0);
        Ok(member.recognizer)
    }

    /// Replaces the configuration of an attached recognizer after a rebuild,
    /// keeping its in-flight state when the configuration is unchanged.
    pub fn reconcile(
        &mut self,
        id: RecognizerId,
        incoming: impl Into<RecognizerKind>,
    ) -> Result<(), RefereeError> {
        let index = self.index_of(id)?;
        self.members[index]
            .recognizer
            .reconcile_from(incoming.into(), &mut self.timers)
            .map_err(|source| RefereeError::Reconcile { id, source })
    }

    pub fn recognizer(&self, id: RecognizerId) -> Option<&RecognizerKind> {
        self.members
            .iter()
            .find(|member| member.id == id)
            .map(|member| &member.recognizer)
    }

    pub fn recognizer_mut(&mut self, id: RecognizerId) -> Option<&mut RecognizerKind> {
        self.members
            .iter_mut()
            .find(|member| member.id == id)
            .map(|member| &mut member.recognizer)
    }

    pub fn state(&self, id: RecognizerId) -> Option<RefereeState> {
        self.recognizer(id).map(|recognizer| recognizer.state())
    }

    /// Ids in rank order.
    pub fn ids(&self) -> impl Iterator<Item = RecognizerId> + '_ {
        self.members.iter().map(|member| member.id)
    }

    /// Whether the previous touch sequence has fully resolved.
    pub fn is_settled(&self) -> bool {
        self.timers.is_empty()
            && self
                .members
                .iter()
                .all(|member| !member.recognizer.state().is_unresolved())
    }

    /// Soft-resets every member.
    pub fn reset_all(&mut self) {
        for member in &mut self.members {
            member.recognizer.reset_status(&mut self.timers);
        }
    }

    /// Cleans every member the way a recycled element would.
    pub fn clean_all(&mut self) {
        for member in &mut self.members {
            member.recognizer.clean_recognizer_state(&mut self.timers);
        }
    }

    pub fn handle_touch(&mut self, touch: &TouchSample) {
        self.dispatch_touch(touch, true);
    }

    /// Dispatches samples delivered together in one frame. Only the last one
    /// is flagged as the end of the flush.
    pub fn handle_touch_batch(&mut self, touches: &[TouchSample]) {
        let last = touches.len().saturating_sub(1);
        for (position, touch) in touches.iter().enumerate() {
            self.dispatch_touch(touch, position == last);
        }
    }

    pub fn handle_axis(&mut self, axis: &AxisSample) {
        self.advance_to(axis.time);
        if axis.action == AxisAction::Begin {
            if self.fingers_down.is_empty() && !self.axis_active {
                self.begin_sequence();
            }
            self.axis_active = true;
        }

        self.dispatch(true, |recognizer, cx| recognizer.handle_axis(axis, cx));

        if matches!(axis.action, AxisAction::End | AxisAction::Cancel) {
            self.axis_active = false;
        }
    }

    /// Fires every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: u64) {
        while let Some(token) = self.timers.pop_due(now) {
            log::trace!("timer {} due at {}ms", token.as_u64(), self.timers.now());
            let mut verdicts = Verdicts::new();
            for index in 0..self.members.len() {
                let consumed = self.deliver(index, true, &mut verdicts, |recognizer, cx| {
                    recognizer.on_timer(token, cx)
                });
                if consumed {
                    break;
                }
            }
            self.settle(verdicts);
        }
        self.timers.set_now(now);
    }

    fn dispatch_touch(&mut self, touch: &TouchSample, flush_end: bool) {
        self.advance_to(touch.time);
        if touch.kind == TouchType::Down {
            if self.fingers_down.is_empty() && !self.axis_active {
                self.begin_sequence();
            }
            self.fingers_down.insert(touch.id);
        }

        self.dispatch(flush_end, |recognizer, cx| {
            recognizer.handle_touch(touch, cx)
        });

        if matches!(touch.kind, TouchType::Up | TouchType::Cancel) {
            self.fingers_down.remove(&touch.id);
        }
    }

    fn begin_sequence(&mut self) {
        if !self.is_settled() {
            log::trace!("previous sequence still unresolved, continuing it");
            return;
        }
        log::trace!("new touch sequence");
        self.reset_all();
    }

    fn dispatch(
        &mut self,
        flush_end: bool,
        mut handle: impl FnMut(&mut RecognizerKind, &mut GestureContext<'_>),
    ) {
        let mut verdicts = Verdicts::new();
        for index in 0..self.members.len() {
            self.deliver(index, flush_end, &mut verdicts, &mut handle);
        }
        self.settle(verdicts);
    }

    fn deliver<R>(
        &mut self,
        index: usize,
        flush_end: bool,
        verdicts: &mut Verdicts,
        f: impl FnOnce(&mut RecognizerKind, &mut GestureContext<'_>) -> R,
    ) -> R {
        let mut ballot = Ballot::new();
        let result = {
            let mut cx = GestureContext::new(&mut ballot, &mut self.timers, &self.targets)
                .with_flush_end(flush_end);
            f(&mut self.members[index].recognizer, &mut cx)
        };
        verdicts.extend(ballot.take().into_iter().map(|vote| (index, vote)));
        result
    }

    fn settle(&mut self, mut verdicts: Verdicts) {
        while let Some((index, disposal)) = verdicts.pop_front() {
            self.resolve(index, disposal, &mut verdicts);
        }
    }

    fn resolve(&mut self, index: usize, disposal: GestureDisposal, verdicts: &mut Verdicts) {
        let state = self.members[index].recognizer.state();
        log::debug!(
            "recognizer {} voted {disposal:?} while {state:?}",
            self.members[index].id.0
        );
        match disposal {
            GestureDisposal::Accept => {
                if state.is_terminal() {
                    return;
                }
                if self.is_blocked(index) {
                    self.deliver(index, true, verdicts, |recognizer, cx| {
                        recognizer.on_blocked(cx)
                    });
                } else {
                    self.accept(index, verdicts);
                }
            }
            GestureDisposal::Pending => {
                if state.is_terminal() {
                    return;
                }
                if self.is_blocked(index) {
                    self.deliver(index, true, verdicts, |recognizer, cx| {
                        recognizer.on_blocked(cx)
                    });
                } else {
                    self.deliver(index, true, verdicts, |recognizer, cx| {
                        recognizer.on_pending(cx)
                    });
                }
            }
            GestureDisposal::Reject => {
                if state == RefereeState::Fail {
                    return;
                }
                self.deliver(index, true, verdicts, |recognizer, cx| {
                    recognizer.on_rejected(cx)
                });
                self.unblock(verdicts);
            }
            GestureDisposal::None => {}
        }
    }

    fn is_parallel(&self, index: usize) -> bool {
        self.members[index].recognizer.priority() == GesturePriority::Parallel
    }

    fn is_blocked(&self, index: usize) -> bool {
        if self.is_parallel(index) {
            return false;
        }
        (0..index).any(|ahead| {
            !self.is_parallel(ahead)
                && matches!(
                    self.members[ahead].recognizer.state(),
                    RefereeState::Pending | RefereeState::PendingBlocked
                )
        })
    }

    fn accept(&mut self, index: usize, verdicts: &mut Verdicts) {
        if !self.is_parallel(index) {
            for other in 0..self.members.len() {
                if other == index || self.is_parallel(other) {
                    continue;
                }
                if self.members[other].recognizer.state().is_terminal() {
                    continue;
                }
                self.deliver(other, true, verdicts, |recognizer, cx| {
                    recognizer.on_rejected(cx)
                });
            }
        }
        self.deliver(index, true, verdicts, |recognizer, cx| {
            recognizer.on_accepted(cx)
        });
    }

    /// Lets the first blocked member with nobody pending ahead of it proceed.
    fn unblock(&mut self, verdicts: &mut Verdicts) {
        for index in 0..self.members.len() {
            if self.is_parallel(index) {
                continue;
            }
            match self.members[index].recognizer.state() {
                RefereeState::Pending => return,
                RefereeState::PendingBlocked => {
                    self.deliver(index, true, verdicts, |recognizer, cx| {
                        recognizer.on_pending(cx)
                    });
                    return;
                }
                RefereeState::SucceedBlocked => {
                    self.accept(index, verdicts);
                    return;
                }
                _ => {}
            }
        }
    }

    fn index_of(&self, id: RecognizerId) -> Result<usize, RefereeError> {
        self.members
            .iter()
            .position(|member| member.id == id)
            .ok_or(RefereeError::UnknownRecognizer(id))
    }
}

#[cfg(test)]
#[path = "tests/referee_tests.rs"]
mod tests;
