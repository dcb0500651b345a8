//! The networked runtime around [`CoordinatorModel`]: per-connection I/O
//! workers feeding the [`PriorityQueue`], and the per-run driving loop
//! (§4.5, §5 of the design notes).

use std::collections::{HashMap, VecDeque};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use roast_core::{
  protocol::{share_val, verify, PreNonce, SessionContext},
  Action, AttackerStrategy, CoordinatorModel, Fq, Point,
};
use roast_transport::{
  recv_obj, send_obj, CoordinatorMessage, Envelope, InitMessage, ParticipantReply, SignRequest, WirePoint,
  WireScalar,
};

use crate::error::RuntimeError;
use crate::queue::{PriorityQueue, QueueItem};

type CtxCache = Mutex<VecDeque<(u64, SessionContext)>>;

enum OutgoingMessage {
  Init(InitMessage),
  SignReq(SignRequest),
}

/// Counters returned by one [`Coordinator::run`] call, matching the CSV row
/// the benchmark binary emits.
#[derive(Clone, Copy, Debug)]
pub struct RunStats {
  pub elapsed: Duration,
  pub send_count: u64,
  pub recv_count: u64,
  pub sessions_started: u64,
}

/// Owns every participant connection and the worker threads reading and
/// writing them. Persists across many [`Self::run`] calls so benchmark
/// repetitions can reuse the same TCP connections (§9, run isolation).
pub struct Coordinator {
  queue: Arc<PriorityQueue>,
  outgoing_tx: mpsc::Sender<(u32, OutgoingMessage)>,
  ctx_caches: HashMap<u32, Arc<CtxCache>>,
  init_messages: HashMap<u32, InitMessage>,
  run_id: Arc<AtomicU64>,
  recv_count: Arc<AtomicU64>,
}

impl Coordinator {
  /// Dials every participant address, spawns one inbound reader thread per
  /// connection and one shared outbound writer thread. Does not send
  /// anything yet — [`Self::run`] sends the (re-)triggering init message at
  /// the start of every run, including the first.
  pub fn connect(
    group_key: &Point,
    i_to_addr: &HashMap<u32, SocketAddr>,
    i_to_sk: &HashMap<u32, Fq>,
  ) -> Result<Self, RuntimeError> {
    let queue = Arc::new(PriorityQueue::new());
    let run_id = Arc::new(AtomicU64::new(0));
    let recv_count = Arc::new(AtomicU64::new(0));
    let (outgoing_tx, outgoing_rx) = mpsc::channel::<(u32, OutgoingMessage)>();

    let mut ctx_caches = HashMap::new();
    let mut write_handles = HashMap::new();
    let mut init_messages = HashMap::new();

    for (&i, addr) in i_to_addr {
      let stream = TcpStream::connect(addr)?;
      stream.set_nodelay(true)?;
      info!(participant = i, %addr, "established connection to participant");

      let cache: Arc<CtxCache> = Arc::new(Mutex::new(VecDeque::new()));
      ctx_caches.insert(i, cache.clone());
      write_handles.insert(i, stream.try_clone()?);

      let sk_i = i_to_sk.get(&i).copied().ok_or(RuntimeError::MissingKeyShare(i))?;
      init_messages
        .insert(i, InitMessage { group_key: WirePoint::from(group_key), i, sk_i: WireScalar::from(&sk_i) });

      let queue = queue.clone();
      let run_id = run_id.clone();
      let recv_count = recv_count.clone();
      thread::Builder::new()
        .name(format!("roast-reader-{i}"))
        .spawn(move || inbound_worker(i, stream, queue, cache, run_id, recv_count))
        .map_err(RuntimeError::Io)?;
    }

    let writer_run_id = run_id.clone();
    thread::Builder::new()
      .name("roast-writer".into())
      .spawn(move || outbound_worker(outgoing_rx, write_handles, writer_run_id))
      .map_err(RuntimeError::Io)?;

    Ok(Self { queue, outgoing_tx, ctx_caches, init_messages, run_id, recv_count })
  }

  /// Drives one signing run to completion: resets per-run state, bumps
  /// `run_id`, retriggers every participant's pre-nonce, then consumes the
  /// priority queue until a session succeeds.
  pub fn run(
    &mut self,
    model: &mut CoordinatorModel,
    attacker: &AttackerStrategy,
    rng: &mut impl Rng,
  ) -> Result<RunStats, RuntimeError> {
    let run_id = self.run_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
    for cache in self.ctx_caches.values() {
      cache.lock().unwrap().clear();
    }
    self.recv_count.store(0, AtomicOrdering::Relaxed);

    let start = Instant::now();
    let mut send_count: u64 = 0;

    for (&i, init) in &self.init_messages {
      self
        .outgoing_tx
        .send((i, OutgoingMessage::Init(init.clone())))
        .map_err(|_| RuntimeError::WorkerUnavailable)?;
      send_count += 1;
    }

    loop {
      match self.queue.pop() {
        QueueItem::Dispatch(Action::NoOp) => {}

        QueueItem::Incoming { i, s_i, pre_i, share_is_valid } => {
          let action = model.handle_incoming(i, s_i, pre_i, share_is_valid)?;
          self.queue.push(QueueItem::Dispatch(action));
        }

        QueueItem::Dispatch(Action::SessionStart(payload)) => {
          let sid = model.sessions_started();
          let t_set: Vec<u32> = payload.iter().map(|(_, i)| *i).collect();
          info!(sid, t_set = ?t_set, "session started");
          let chosen_malicious = attacker.choose(rng, &t_set, sid);

          for (ctx, i) in payload {
            if let Some(cache) = self.ctx_caches.get(&i) {
              cache.lock().unwrap().push_back((run_id, ctx.clone()));
            }

            let req = SignRequest {
              msg: ctx.msg.clone(),
              t_set: ctx.t_set.clone(),
              pre_d: WirePoint::from(&ctx.pre.0),
              pre_e: WirePoint::from(&ctx.pre.1),
              is_malicious: chosen_malicious.contains(&i),
            };
            self
              .outgoing_tx
              .send((i, OutgoingMessage::SignReq(req)))
              .map_err(|_| RuntimeError::WorkerUnavailable)?;
            send_count += 1;
          }
        }

        QueueItem::Dispatch(Action::SessionSuccess(payload)) => {
          let (ctx, sig) = *payload;
          if !verify(&ctx.group_key, &ctx.msg, &sig) {
            return Err(RuntimeError::VerificationFailed);
          }
          let elapsed = start.elapsed();
          info!(?elapsed, sessions_started = model.sessions_started(), "run succeeded");
          return Ok(RunStats {
            elapsed,
            send_count,
            recv_count: self.recv_count.load(AtomicOrdering::Relaxed),
            sessions_started: model.sessions_started(),
          });
        }
      }
    }
  }
}

fn inbound_worker(
  i: u32,
  mut stream: TcpStream,
  queue: Arc<PriorityQueue>,
  cache: Arc<CtxCache>,
  run_id: Arc<AtomicU64>,
  recv_count: Arc<AtomicU64>,
) {
  loop {
    let envelope: Envelope<ParticipantReply> = match recv_obj(&mut stream) {
      Ok(Some(env)) => env,
      Ok(None) => {
        debug!(participant = i, "connection closed");
        return;
      }
      Err(e) => {
        warn!(participant = i, error = %e, "transport error reading from participant, closing");
        return;
      }
    };

    if envelope.run_id != run_id.load(AtomicOrdering::Relaxed) {
      debug!(participant = i, frame_run_id = envelope.run_id, "discarding stale-run frame");
      continue;
    }

    let body = envelope.body;
    let (d_i, e_i) = match (Point::try_from(&body.pre_d), Point::try_from(&body.pre_e)) {
      (Ok(d), Ok(e)) => (d, e),
      _ => {
        warn!(participant = i, "malformed pre-nonce on wire, dropping message");
        continue;
      }
    };
    let pre_i = PreNonce { d_i, e_i };

    recv_count.fetch_add(1, AtomicOrdering::Relaxed);

    let item = match body.s_i {
      None => {
        debug!(participant = i, "initial pre-nonce from participant");
        QueueItem::Incoming { i, s_i: None, pre_i, share_is_valid: false }
      }
      Some(wire_s) => {
        let s_i = match Fq::try_from(&wire_s) {
          Ok(s) => s,
          Err(_) => {
            warn!(participant = i, "malformed share scalar on wire, dropping message");
            continue;
          }
        };

        let share_is_valid = {
          let mut cache = cache.lock().unwrap();
          match cache.pop_front() {
            Some((cached_run, ctx)) => cached_run == envelope.run_id && share_val(&ctx, i, s_i),
            None => false,
          }
        };
        QueueItem::Incoming { i, s_i: Some(s_i), pre_i, share_is_valid }
      }
    };
    queue.push(item);
  }
}

fn outbound_worker(rx: mpsc::Receiver<(u32, OutgoingMessage)>, mut connections: HashMap<u32, TcpStream>, run_id: Arc<AtomicU64>) {
  while let Ok((i, message)) = rx.recv() {
    let current_run = run_id.load(AtomicOrdering::Relaxed);
    let stream = match connections.get_mut(&i) {
      Some(stream) => stream,
      None => {
        warn!(participant = i, "no connection for outgoing message");
        continue;
      }
    };

    let result = match message {
      OutgoingMessage::Init(body) => send_obj(stream, &Envelope::new(current_run, CoordinatorMessage::Init(body))),
      OutgoingMessage::SignReq(body) => {
        send_obj(stream, &Envelope::new(current_run, CoordinatorMessage::SignReq(body)))
      }
    };
    if let Err(e) = result {
      warn!(participant = i, error = %e, "failed to send to participant");
    }
  }
}
