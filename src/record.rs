use std::fs::File;
use std::io::Write;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::action::Action;
use crate::Coup;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write game record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush game record: {0}")]
    Io(#[from] std::io::Error),
}

/// One applied action and the coin and card counts it left behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub game: usize,
    pub turn: usize,
    pub actor: usize,
    pub action: Action,
    pub p1_coins: u8,
    pub p2_coins: u8,
    pub p1_face_up: usize,
    pub p2_face_up: usize,
    pub game_over: bool,
}

/// Writes every applied action of one or more games as csv rows.
pub struct GameRecorder<W: Write> {
    writer: csv::Writer<W>,
    game: usize,
}

impl GameRecorder<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
            game: 0,
        })
    }
}

impl<W: Write> GameRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            game: 0,
        }
    }

    pub fn start_game(&mut self) {
        self.game += 1;
    }

    /// Records `action`, taken by `actor` on `turn`, against the game state it produced.
    pub fn record(&mut self, turn: usize, actor: usize, action: Action, after: &Coup) -> Result<(), RecordError> {
        let players = after.players();
        self.writer.serialize(RecordRow {
            game: self.game,
            turn,
            actor,
            action,
            p1_coins: players[0].coins(),
            p2_coins: players[1].coins(),
            p1_face_up: players[0].face_up_count(),
            p2_face_up: players[1].face_up_count(),
            game_over: after.is_game_over(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, RecordError> {
        self.writer
            .into_inner()
            .map_err(|err| RecordError::Io(err.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::action::Action;
    use crate::record::{GameRecorder, RecordRow};
    use crate::Coup;

    #[test]
    fn records_each_action() {
        let mut rng = Pcg64::seed_from_u64(11);
        let mut coup = Coup::new(0, &mut rng).unwrap();
        let mut recorder = GameRecorder::new(Vec::new());
        recorder.start_game();

        for action in [Action::ForeignAid, Action::PassForeignAid, Action::Income] {
            let (turn, actor) = (coup.turn(), coup.whose_action());
            coup.step(action, &mut rng).unwrap();
            recorder.record(turn, actor, action, &coup).unwrap();
        }

        let bytes = recorder.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("game,turn,actor,action,p1_coins,p2_coins,p1_face_up,p2_face_up,game_over"));
        assert_eq!(lines.next(), Some("1,0,0,foreign_aid,1,2,0,0,false"));
        assert_eq!(lines.next(), Some("1,0,1,pass_fa,3,2,0,0,false"));
        assert_eq!(lines.next(), Some("1,1,1,income,3,3,0,0,false"));
        assert_eq!(lines.next(), None);

        let rows: Vec<RecordRow> = csv::Reader::from_reader(text.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].action, Action::PassForeignAid);
    }
}
