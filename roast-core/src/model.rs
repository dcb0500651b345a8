//! The pure coordinator state machine. No I/O: every transition is a
//! function of the current state and one incoming event.

use std::collections::{HashMap, HashSet};

use crate::{
  curve::Fq,
  error::CoreError,
  protocol::{pre_agg, sign_agg, PreNonce, SessionContext, Signature},
};

/// Dispatch tag returned by [`CoordinatorModel::handle_incoming`]. The
/// numeric value is the scheduling priority (lower sorts first) so that a
/// completed signature always preempts pending work already queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ActionType {
  NoOp = 1,
  SessionSuccess = 2,
  Incoming = 3,
  SessionStart = 4,
}

/// What a [`ActionType::SessionStart`] action hands the runtime: one
/// [`SessionContext`] per newly-scheduled participant.
pub type SessionStartPayload = Vec<(SessionContext, u32)>;

/// What a [`ActionType::SessionSuccess`] action hands the runtime.
pub type SessionSuccessPayload = (SessionContext, Signature);

/// The result of one [`CoordinatorModel::handle_incoming`] call.
pub enum Action {
  NoOp,
  SessionStart(SessionStartPayload),
  SessionSuccess(Box<SessionSuccessPayload>),
}

impl Action {
  pub fn action_type(&self) -> ActionType {
    match self {
      Action::NoOp => ActionType::NoOp,
      Action::SessionStart(_) => ActionType::SessionStart,
      Action::SessionSuccess(_) => ActionType::SessionSuccess,
    }
  }
}

/// Pure ROAST coordinator state. Tracks participant readiness, open
/// sessions, and which participants have been excluded as malicious.
///
/// Invariants held after every [`Self::handle_incoming`] call:
/// 1. `ready.len() < t`.
/// 2. `malicious.len() <= n - t`.
/// 3. `malicious` and `ready` are disjoint; `malicious` and any open
///    session's `T` were disjoint the moment that session opened.
/// 4. Every `i` in `ready` has an entry in `i_to_pre`.
/// 5. `i_to_sid[i]` names the most recent session i participated in.
/// 6. No open session ever holds `t` or more recorded shares.
pub struct CoordinatorModel {
  group_key: crate::curve::Point,
  i_to_x: HashMap<u32, crate::curve::Point>,
  t: u16,
  n: u16,
  msg: Vec<u8>,

  ready: HashSet<u32>,
  malicious: HashSet<u32>,

  i_to_pre: HashMap<u32, PreNonce>,
  i_to_sid: HashMap<u32, u64>,

  sid_ctr: u64,
  sid_to_t_set: HashMap<u64, Vec<u32>>,
  sid_to_pre: HashMap<u64, (crate::curve::Point, crate::curve::Point)>,
  sid_to_i_to_s: HashMap<u64, HashMap<u32, Fq>>,
}

impl CoordinatorModel {
  pub fn new(
    group_key: crate::curve::Point,
    i_to_x: HashMap<u32, crate::curve::Point>,
    t: u16,
    n: u16,
    msg: Vec<u8>,
  ) -> Result<Self, CoreError> {
    if t == 0 || t > n || i_to_x.len() != usize::from(n) {
      return Err(CoreError::InvalidParameters(t, n));
    }
    Ok(Self {
      group_key,
      i_to_x,
      t,
      n,
      msg,
      ready: HashSet::new(),
      malicious: HashSet::new(),
      i_to_pre: HashMap::new(),
      i_to_sid: HashMap::new(),
      sid_ctr: 0,
      sid_to_t_set: HashMap::new(),
      sid_to_pre: HashMap::new(),
      sid_to_i_to_s: HashMap::new(),
    })
  }

  pub fn malicious(&self) -> &HashSet<u32> {
    &self.malicious
  }

  pub fn sessions_started(&self) -> u64 {
    self.sid_ctr
  }

  fn session_context(&self, sid: u64, i: u32) -> SessionContext {
    let t_set = self.sid_to_t_set[&sid].clone();
    SessionContext {
      group_key: self.group_key,
      i_to_x: self.i_to_x.clone(),
      msg: self.msg.clone(),
      t_set,
      pre: self.sid_to_pre[&sid],
      pre_i: self.i_to_pre[&i],
    }
  }

  fn mark_malicious(&mut self, i: u32) -> Result<(), CoreError> {
    self.malicious.insert(i);
    if self.malicious.len() > usize::from(self.n - self.t) {
      return Err(CoreError::InvariantBreach(self.malicious.len()));
    }
    Ok(())
  }

  /// Advances the model by one event. `share_is_valid` must already reflect
  /// `share_val(ctx, i, s_i)` for the session `i` is currently in — the
  /// runtime precomputes it off the event-loop thread so this call never
  /// touches a curve operation.
  pub fn handle_incoming(
    &mut self,
    i: u32,
    s_i: Option<Fq>,
    pre_i: PreNonce,
    share_is_valid: bool,
  ) -> Result<Action, CoreError> {
    if self.malicious.contains(&i) {
      return Ok(Action::NoOp);
    }

    if self.ready.contains(&i) || (!self.i_to_pre.contains_key(&i) && s_i.is_some()) {
      self.mark_malicious(i)?;
      return Ok(Action::NoOp);
    }

    if let Some(s_i) = s_i {
      if !share_is_valid {
        self.mark_malicious(i)?;
        return Ok(Action::NoOp);
      }

      let sid = match self.i_to_sid.get(&i) {
        Some(&sid) => sid,
        // i has a recorded pre-nonce but was never scheduled into a
        // session: an unsolicited share, not a protocol-honest one.
        None => {
          self.mark_malicious(i)?;
          return Ok(Action::NoOp);
        }
      };
      self.sid_to_i_to_s.entry(sid).or_default().insert(i, s_i);

      if self.sid_to_i_to_s[&sid].len() == usize::from(self.t) {
        let ctx = self.session_context(sid, i);
        let sig = sign_agg(&ctx, &self.sid_to_i_to_s[&sid])?;
        return Ok(Action::SessionSuccess(Box::new((ctx, sig))));
      }
    }

    self.i_to_pre.insert(i, pre_i);
    self.ready.insert(i);

    if self.ready.len() == usize::from(self.t) {
      self.sid_ctr += 1;
      let sid = self.sid_ctr;
      let t_set: Vec<u32> = self.ready.iter().copied().collect();

      let pre = pre_agg(&self.i_to_pre, &t_set);
      self.sid_to_t_set.insert(sid, t_set.clone());
      self.sid_to_pre.insert(sid, pre);

      let mut payload = Vec::with_capacity(t_set.len());
      for &member in &t_set {
        self.i_to_sid.insert(member, sid);
        payload.push((self.session_context(sid, member), member));
      }
      self.ready.clear();

      return Ok(Action::SessionStart(payload));
    }

    Ok(Action::NoOp)
  }
}
