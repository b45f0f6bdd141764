//! Generate one session per game type and summarize the realized bursts

use ghostly_core::MuscleSide;
use ghostly_simulation::{synthesize_session, BfrProtocol, GameType};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let mut rng = StdRng::seed_from_u64(2025);

    for game in [GameType::MazeRun, GameType::SpaceGame, GameType::Other] {
        let options = game.options(None, &mut rng);
        let session = synthesize_session(&options, &mut rng);

        println!("{}: {} points, {} pauses", game, session.len(), session.pauses.len());
        for side in MuscleSide::BOTH {
            let stats = session.channel_stats(side);
            println!(
                "   {:5} {:2} contractions, peak {:.2}, mean {:.3}",
                side.to_string(),
                session.contraction_count(Some(side)),
                stats.max,
                stats.mean
            );
        }
    }

    let protocol = BfrProtocol::default();
    println!("\nBFR protocol ({:.0} min total)", protocol.total_seconds() / 60.0);
    for (set, session) in protocol.sessions(&mut rng).iter().enumerate() {
        println!("   set {}: {} contractions", set + 1, session.contraction_count(None));
    }
}
