//! Listens for one coordinator connection at a time, handles the init
//! message, then answers an arbitrary number of sign requests across
//! potentially many benchmark runs on the same connection (§9).

use std::collections::HashMap;
use std::net::{Ipv4Addr, TcpListener, TcpStream};

use clap::Parser;
use tracing::{debug, error, info, warn};

use roast_core::protocol::{SecretPreNonce, SessionContext};
use roast_core::{Fq, Point};
use roast_participant::{NonceCache, Participant, ParticipantError};
use roast_transport::{
  recv_obj, send_obj, CoordinatorMessage, Envelope, ParticipantReply, WirePoint, WireScalar,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "ROAST participant process")]
struct Cli {
  /// Port to listen on.
  port: u16,
  /// Size of the precomputed nonce pool; must cover the number of sessions
  /// this participant expects to join across the process's lifetime.
  num_precomputed_nonces: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

  let cli = Cli::parse();
  let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, cli.port))?;
  info!(port = cli.port, "participant listening");

  loop {
    let (stream, addr) = listener.accept()?;
    info!(%addr, "coordinator connected");
    if let Err(e) = handle_connection(stream, cli.num_precomputed_nonces) {
      error!(error = %e, "connection ended with an error");
    }
  }
}

fn handle_connection(mut stream: TcpStream, num_nonces: usize) -> Result<(), ParticipantError> {
  stream.set_nodelay(true)?;

  let mut participant: Option<Participant> = None;
  let mut current_nonce: Option<(SecretPreNonce, roast_core::PreNonce)> = None;

  loop {
    let envelope: Envelope<CoordinatorMessage> = match recv_obj(&mut stream)? {
      Some(env) => env,
      None => {
        info!("coordinator disconnected");
        return Ok(());
      }
    };

    match envelope.body {
      CoordinatorMessage::Init(init) => {
        let sk_i = Fq::try_from(&init.sk_i)?;
        let group_key = Point::try_from(&init.group_key)?;
        let cache = NonceCache::new(&mut rand::thread_rng(), num_nonces);
        let mut p = Participant::new(init.i, sk_i, group_key, cache);

        let (secret, public) = p.cache.draw()?;
        current_nonce = Some((secret, public));
        info!(participant = p.i, run_id = envelope.run_id, "initialized, pushing pre-nonce");

        let reply = ParticipantReply {
          i: p.i,
          s_i: None,
          pre_d: WirePoint::from(&public.d_i),
          pre_e: WirePoint::from(&public.e_i),
        };
        send_obj(&mut stream, &Envelope::new(envelope.run_id, reply))?;
        participant = Some(p);
      }

      CoordinatorMessage::SignReq(req) => {
        let p = match participant.as_mut() {
          Some(p) => p,
          None => {
            warn!("sign request before init, ignoring");
            continue;
          }
        };

        if req.is_malicious {
          debug!(participant = p.i, "configured malicious for this session, dropping sign request");
          continue;
        }

        let (spre, pre_i) = match current_nonce {
          Some(pair) => pair,
          None => {
            warn!(participant = p.i, "sign request before any pre-nonce was sent, ignoring");
            continue;
          }
        };

        let ctx = SessionContext {
          group_key: p.group_key,
          i_to_x: HashMap::new(), // sign_round never consults i_to_x
          msg: req.msg,
          t_set: req.t_set,
          pre: (Point::try_from(&req.pre_d)?, Point::try_from(&req.pre_e)?),
          pre_i,
        };
        let s_i = p.sign(&ctx, spre);

        let (next_secret, next_public) = p.cache.draw()?;
        current_nonce = Some((next_secret, next_public));

        let reply = ParticipantReply {
          i: p.i,
          s_i: Some(WireScalar::from(&s_i)),
          pre_d: WirePoint::from(&next_public.d_i),
          pre_e: WirePoint::from(&next_public.e_i),
        };
        send_obj(&mut stream, &Envelope::new(envelope.run_id, reply))?;
      }
    }
  }
}
