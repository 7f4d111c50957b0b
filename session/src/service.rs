use std::sync::Arc;
use sweeper_core::{
    BoardBlob, BoardSnapshot, Cell, Coord, EngineConfig, GameEngine, RevealOutcome, RevealReport,
};

use crate::*;

/// A saved game as listed to players.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEntry {
    pub record: GameRecord,
    pub owner_name: String,
}

/// Game play for a single session, plus the link to the saved game it came
/// from (if any).
///
/// Finishing a game that is backed by a saved record writes the final status
/// and board back to the store right away.
pub struct GameService {
    engine: GameEngine,
    store: Arc<dyn GameStore>,
    auth: Arc<dyn Authenticator>,
    game_id: Option<GameId>,
}

impl GameService {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn GameStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            engine: GameEngine::new(config),
            store,
            auth,
            game_id: None,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Saved game this session is playing, if it was saved or opened.
    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    /// Fresh board with the configured size and difficulty. The new board is
    /// not tied to any saved game.
    pub fn reset(&mut self) -> Result<BoardSnapshot> {
        let snapshot = self.engine.new_game()?;
        self.game_id = None;
        Ok(snapshot)
    }

    pub fn reset_to(&mut self, size: Coord, difficulty_percent: i32) -> Result<BoardSnapshot> {
        let snapshot = self.engine.reset(size, difficulty_percent)?;
        self.game_id = None;
        Ok(snapshot)
    }

    /// Reveals a cell. When the move ends a saved game the record is updated
    /// too; the move stands even if that write fails, and the record can be
    /// brought up to date later with [`GameService::update`].
    pub fn reveal(&mut self, row: Coord, col: Coord) -> Result<RevealReport> {
        let report = self.engine.reveal(row, col)?;
        if matches!(report.change, RevealOutcome::Won | RevealOutcome::HitMine) {
            log::info!("{}", report.message);
            if let Err(err) = self.write_back_finished() {
                log::warn!("Could not record the end of game {:?}: {}", self.game_id, err);
            }
        }
        Ok(report)
    }

    fn write_back_finished(&mut self) -> Result<()> {
        if self.has_valid_game_id()? {
            self.update()?;
        }
        Ok(())
    }

    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> Result<Cell> {
        Ok(self.engine.toggle_flag(row, col)?)
    }

    pub fn cycle_mark(&mut self, row: Coord, col: Coord) -> Result<Cell> {
        Ok(self.engine.cycle_mark(row, col)?)
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot> {
        Ok(self.engine.snapshot()?)
    }

    pub fn export(&self) -> Result<BoardBlob> {
        Ok(self.engine.export_state()?)
    }

    /// Loads a board from outside the store. Like [`GameService::reset`], the
    /// result is not tied to any saved game.
    pub fn import(&mut self, blob: &BoardBlob) -> Result<BoardSnapshot> {
        let snapshot = self.engine.import_state(blob)?;
        self.game_id = None;
        Ok(snapshot)
    }

    /// Saves the game in play. A game that already has a record is updated in
    /// place, anything else gets a new record owned by `username`. Finished
    /// games are never saved.
    pub fn save(&mut self, username: &str, display_name: &str) -> Result<GameId> {
        if self.engine.is_game_over() {
            log::error!("Refusing to save a finished game for {}", username);
            return Err(SessionError::GameFinished);
        }
        if let Some(id) = self.game_id {
            if self.has_valid_game_id()? {
                self.update()?;
                return Ok(id);
            }
        }

        let owner = self.auth.resolve(username)?;
        let board = self.engine.export_state()?;
        let id = self.store.create(NewGame {
            owner: owner.user_id,
            status: GameStatus::InProgress,
            board,
            display_name: display_name.into(),
        })?;
        log::info!("Saved game {} for {}", id, owner.username);
        self.game_id = Some(id);
        Ok(id)
    }

    /// Continues a saved game; the current board is kept if the record cannot
    /// be loaded.
    pub fn open(&mut self, id: GameId) -> Result<BoardSnapshot> {
        let record = self.store.get(id)?.ok_or(SessionError::GameNotFound(id))?;
        let snapshot = self.engine.import_state(&record.board)?;
        self.game_id = Some(id);
        log::info!("Opened game {} ({})", id, record.display_name);
        Ok(snapshot)
    }

    /// Writes the current status and board back to the open saved game.
    pub fn update(&mut self) -> Result<GameStatus> {
        let id = self.game_id.ok_or(SessionError::NoActiveGame)?;
        let status = self
            .engine
            .outcome()
            .map(GameStatus::from)
            .ok_or(SessionError::NoActiveGame)?;
        self.store.update(id, status, self.engine.export_state()?)?;
        Ok(status)
    }

    /// Whether the session is tied to a record that still exists.
    pub fn has_valid_game_id(&self) -> Result<bool> {
        match self.game_id {
            Some(id) => Ok(self.store.get(id)?.is_some()),
            None => Ok(false),
        }
    }

    /// Every saved game together with its owner's full name.
    pub fn games(&self) -> Result<Vec<GameEntry>> {
        self.store
            .list()?
            .into_iter()
            .map(|record| self.entry(record))
            .collect()
    }

    pub fn game(&self, id: GameId) -> Result<GameEntry> {
        let record = self.store.get(id)?.ok_or(SessionError::GameNotFound(id))?;
        self.entry(record)
    }

    fn entry(&self, record: GameRecord) -> Result<GameEntry> {
        let owner = self.auth.identity(record.owner)?;
        Ok(GameEntry {
            owner_name: owner.full_name,
            record,
        })
    }

    pub fn delete(&mut self, id: GameId) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(SessionError::GameNotFound(id));
        }
        if self.game_id == Some(id) {
            self.game_id = None;
        }
        log::info!("Deleted game {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Coord2, FixedMinePlacer, Outcome};

    fn service() -> (GameService, Arc<MemoryGameStore>) {
        let store = Arc::new(MemoryGameStore::new());
        let auth = Arc::new(StaticAuthenticator::new().with_user("ada", "Ada Lovelace"));
        let service = GameService::new(EngineConfig::default(), store.clone(), auth);
        (service, store)
    }

    fn deal(service: &mut GameService, mines: &[Coord2]) {
        service
            .engine
            .reset_with(3, 10, FixedMinePlacer::new(mines))
            .unwrap();
        service.game_id = None;
    }

    #[test]
    fn save_creates_then_updates() {
        let (mut service, store) = service();
        deal(&mut service, &[(1, 1)]);

        let id = service.save("ada", "lunch break").unwrap();
        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.owner, UserId(1));
        assert_eq!(record.status, GameStatus::InProgress);
        assert_eq!(record.display_name, "lunch break");

        service.reveal(0, 0).unwrap();
        assert_eq!(service.save("ada", "ignored").unwrap(), id);
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.get(id).unwrap().unwrap().display_name, "lunch break");
    }

    #[test]
    fn save_needs_a_known_user() {
        let (mut service, store) = service();
        deal(&mut service, &[(1, 1)]);
        assert_eq!(
            service.save("mallory", "mine"),
            Err(SessionError::UnknownUser("mallory".into()))
        );
        assert!(store.list().unwrap().is_empty());
        assert_eq!(service.game_id(), None);
    }

    #[test]
    fn finished_unsaved_game_cannot_be_saved() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        service.reveal(1, 1).unwrap();
        assert_eq!(service.save("ada", "oops"), Err(SessionError::GameFinished));
    }

    #[test]
    fn ending_a_saved_game_updates_its_status() {
        let (mut service, store) = service();
        deal(&mut service, &[(1, 1)]);
        let id = service.save("ada", "doomed").unwrap();

        service.reveal(1, 1).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().status, GameStatus::Failed);
    }

    #[test]
    fn open_resumes_saved_board() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        service.reveal(0, 0).unwrap();
        service.toggle_flag(1, 1).unwrap();
        let id = service.save("ada", "resume me").unwrap();
        let saved = service.snapshot().unwrap();

        service.reset().unwrap();
        assert_eq!(service.game_id(), None);

        let resumed = service.open(id).unwrap();
        assert_eq!(resumed, saved);
        assert_eq!(service.game_id(), Some(id));

        let mut report = None;
        for (row, col) in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            report = Some(service.reveal(row, col).unwrap());
        }
        assert_eq!(report.unwrap().outcome, Outcome::Won);
        assert_eq!(service.game(id).unwrap().record.status, GameStatus::Completed);
    }

    #[test]
    fn open_unknown_game_keeps_board() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        let before = service.snapshot().unwrap();

        assert_eq!(
            service.open(GameId(9)),
            Err(SessionError::GameNotFound(GameId(9)))
        );
        assert_eq!(service.snapshot().unwrap(), before);
    }

    #[test]
    fn import_detaches_from_saved_game() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        service.save("ada", "original").unwrap();
        let blob = service.export().unwrap();

        service.import(&blob).unwrap();
        assert_eq!(service.game_id(), None);
        assert!(service.import(&BoardBlob::from("{".to_string())).is_err());
    }

    #[test]
    fn listing_names_the_owner() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        let id = service.save("ADA", "named").unwrap();

        let games = service.games().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].owner_name, "Ada Lovelace");
        assert_eq!(games[0].record.id, id);
        assert_eq!(service.game(id).unwrap().owner_name, "Ada Lovelace");
    }

    /// Store that loses every write after the first save.
    struct ReadOnlyStore(MemoryGameStore);

    impl GameStore for ReadOnlyStore {
        fn create(&self, game: NewGame) -> Result<GameId> {
            self.0.create(game)
        }

        fn get(&self, id: GameId) -> Result<Option<GameRecord>> {
            self.0.get(id)
        }

        fn update(&self, _: GameId, _: GameStatus, _: BoardBlob) -> Result<()> {
            Err(SessionError::StoreUnavailable("read only".into()))
        }

        fn delete(&self, id: GameId) -> Result<bool> {
            self.0.delete(id)
        }

        fn list(&self) -> Result<Vec<GameRecord>> {
            self.0.list()
        }
    }

    #[test]
    fn finishing_move_stands_when_store_write_fails() {
        let store = Arc::new(ReadOnlyStore(MemoryGameStore::new()));
        let auth = Arc::new(StaticAuthenticator::new().with_user("ada", "Ada Lovelace"));
        let mut service = GameService::new(EngineConfig::default(), store.clone(), auth);
        deal(&mut service, &[(1, 1)]);
        let id = service.save("ada", "unlucky").unwrap();

        let report = service.reveal(1, 1).unwrap();
        assert_eq!(report.change, RevealOutcome::HitMine);
        assert_eq!(service.engine().outcome(), Some(Outcome::Lost));
        assert_eq!(store.get(id).unwrap().unwrap().status, GameStatus::InProgress);
        assert_eq!(
            service.update(),
            Err(SessionError::StoreUnavailable("read only".into()))
        );
    }

    #[test]
    fn update_without_saved_game_fails() {
        let (mut service, _) = service();
        deal(&mut service, &[(1, 1)]);
        assert_eq!(service.update(), Err(SessionError::NoActiveGame));
    }

    #[test]
    fn delete_detaches_current_game() {
        let (mut service, store) = service();
        deal(&mut service, &[(1, 1)]);
        let id = service.save("ada", "short lived").unwrap();

        service.delete(id).unwrap();
        assert_eq!(service.game_id(), None);
        assert!(!service.has_valid_game_id().unwrap());
        assert!(store.list().unwrap().is_empty());
        assert_eq!(service.delete(id), Err(SessionError::GameNotFound(id)));
    }
}
