//! Benchmark harness: acts as a centralized dealer for threshold key
//! generation, then drives `<runs>` independent ROAST signing runs over TCP
//! connections to `<n>` participant processes, appending one CSV row per run.

use std::collections::HashMap;
use std::net::{SocketAddr, ToSocketAddrs};

use clap::Parser;
use rand::Rng;

use roast_coordinator::Coordinator;
use roast_core::curve::{point_mul, random_nonzero_scalar, GENERATOR};
use roast_core::shamir::split_secret;
use roast_core::{AttackerLevel, AttackerStrategy, CoordinatorModel};

/// Attacker level as a CLI value; kept separate from `roast_core::AttackerLevel`
/// so the pure crate doesn't need a `clap` dependency.
#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum AttackerLevelArg {
  Static,
  StaticCoordination,
  Adaptive,
}

impl From<AttackerLevelArg> for AttackerLevel {
  fn from(arg: AttackerLevelArg) -> Self {
    match arg {
      AttackerLevelArg::Static => AttackerLevel::Static,
      AttackerLevelArg::StaticCoordination => AttackerLevel::StaticCoordination,
      AttackerLevelArg::Adaptive => AttackerLevel::Adaptive,
    }
  }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "ROAST coordinator benchmark harness")]
struct Cli {
  /// Host (or IP) every participant is listening on.
  host: String,
  /// Port of participant 1; participant i listens on start_port + (i - 1).
  start_port: u16,
  /// Signing threshold.
  t: u16,
  /// Total participant count.
  n: u16,
  /// Number of malicious identities the attacker strategy draws from.
  f: u16,
  /// Attacker strategy driving which participants misbehave each session.
  #[arg(value_enum)]
  attacker_level: AttackerLevelArg,
  /// Number of independent signing runs to benchmark.
  runs: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

  let cli = Cli::parse();
  if cli.t == 0 || cli.t > cli.n || cli.f > cli.n - cli.t {
    return Err(format!("invalid parameters: need 0 < t <= n and f <= n - t (t={}, n={}, f={})", cli.t, cli.n, cli.f).into());
  }

  let mut rng = rand::thread_rng();

  // Centralized dealer keygen: simple by design, since key generation is not
  // the focus of ROAST. A production deployment would run a DKG instead.
  let secret = random_nonzero_scalar(&mut rng);
  let i_to_sk = split_secret(&mut rng, secret, cli.t, cli.n);
  let group_key = point_mul(GENERATOR, secret);
  let i_to_x: HashMap<u32, _> = i_to_sk.iter().map(|(&i, &sk_i)| (i, point_mul(GENERATOR, sk_i))).collect();

  let mut i_to_addr: HashMap<u32, SocketAddr> = HashMap::new();
  for i in 1 ..= u32::from(cli.n) {
    let port = cli.start_port + (i as u16 - 1);
    let addr = (cli.host.as_str(), port)
      .to_socket_addrs()?
      .next()
      .ok_or_else(|| format!("could not resolve {}:{port}", cli.host))?;
    i_to_addr.insert(i, addr);
  }

  let mut coordinator = Coordinator::connect(&group_key, &i_to_addr, &i_to_sk)?;

  let mut csv_writer = csv::Writer::from_writer(std::io::stdout());
  csv_writer.write_record(["t", "n", "f", "attacker_level", "elapsed_secs", "send_count", "recv_count", "sessions_started"])?;

  for run_index in 0 .. cli.runs {
    let msg: Vec<u8> = (0 .. 32).map(|_| rng.gen()).collect();
    let mut model = CoordinatorModel::new(group_key, i_to_x.clone(), cli.t, cli.n, msg)?;
    let attacker = AttackerStrategy::new(&mut rng, cli.attacker_level.into(), cli.n, cli.f);

    let stats = coordinator.run(&mut model, &attacker, &mut rng)?;
    tracing::info!(run = run_index, ?stats, "run complete");

    csv_writer.write_record([
      cli.t.to_string(),
      cli.n.to_string(),
      cli.f.to_string(),
      format!("{:?}", cli.attacker_level),
      stats.elapsed.as_secs_f64().to_string(),
      stats.send_count.to_string(),
      stats.recv_count.to_string(),
      stats.sessions_started.to_string(),
    ])?;
    csv_writer.flush()?;
  }

  Ok(())
}
