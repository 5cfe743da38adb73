use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::deck::{AttributeSelection, Deck};
use crate::session::Session;

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY: &[u8] = b"pairs_cli_history_key_no_peeking";
const HMAC_SIZE: usize = 32;

/// A single recorded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub pair_count: usize,
    pub selection: AttributeSelection,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub completed: bool,
    pub total_flips: u32,
    /// The deal, so a game can be replayed card for card.
    pub initial_deck: Option<Deck>,
}

impl GameRecord {
    pub fn new(seed: u64, deck: &Deck, selection: AttributeSelection, start_time: i64) -> Self {
        Self {
            seed,
            pair_count: deck.pair_count(),
            selection,
            start_time,
            end_time: None,
            completed: false,
            total_flips: 0,
            initial_deck: Some(deck.clone()),
        }
    }

    /// Close the record, finished or abandoned.
    pub fn finish(&mut self, session: &Session, end_time: i64) {
        self.end_time = Some(end_time);
        self.total_flips = session.total_flips();
        self.completed = session.is_complete();
    }
}

/// The entire game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct History {
    pub records: Vec<GameRecord>,
}

impl History {
    // -------------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------------

    pub fn games_played(&self) -> usize {
        self.records.len()
    }

    pub fn games_completed(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }

    /// Fewest flips over completed games of the given size.
    pub fn best_flips(&self, pair_count: usize) -> Option<u32> {
        self.records
            .iter()
            .filter(|r| r.completed && r.pair_count == pair_count)
            .map(|r| r.total_flips)
            .min()
    }

    /// Board sizes that have at least one completed game, ascending.
    pub fn completed_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .records
            .iter()
            .filter(|r| r.completed)
            .map(|r| r.pair_count)
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Load the history from the default location. Never fails: a missing,
    /// corrupted or tampered file yields an empty history.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let mut data = Vec::new();
        match File::open(path) {
            Ok(mut f) => {
                if f.read_to_end(&mut data).is_err() {
                    return Self::default();
                }
            }
            Err(_) => return Self::default(),
        }

        Self::decode(&data).unwrap_or_default()
    }

    /// Write atomically: temp file, sync, then rename over `path`.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let data = self.encode()?;

        let mut temp_path = path.to_path_buf();
        temp_path.set_extension("tmp");

        let result = File::create(&temp_path).and_then(|mut f| {
            f.write_all(&data)?;
            f.sync_all()
        });
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, path)
    }

    /// Payload followed by its HMAC-SHA256 signature.
    fn encode(&self) -> io::Result<Vec<u8>> {
        let mut data = bincode::serialize(self).map_err(io::Error::other)?;

        let mut mac = HmacSha256::new_from_slice(SECRET_KEY)
            .map_err(|_| io::Error::other("invalid history key length"))?;
        mac.update(&data);
        data.extend_from_slice(&mac.finalize().into_bytes());
        Ok(data)
    }

    fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < HMAC_SIZE {
            // Too small to even contain the HMAC
            return None;
        }

        let (payload, signature) = data.split_at(data.len() - HMAC_SIZE);

        let mut mac = HmacSha256::new_from_slice(SECRET_KEY).ok()?;
        mac.update(payload);
        if mac.verify_slice(signature).is_err() {
            eprintln!("[WARN] History file signature mismatched! Starting with fresh history.");
            return None;
        }

        bincode::deserialize(payload).ok()
    }

    /// `history.dat` in the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "pairs", "pairs-cli")?;
        Some(proj_dirs.data_dir().join("history.dat"))
    }
}

/// Seconds since the Unix epoch, 0 if the clock is before it.
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
