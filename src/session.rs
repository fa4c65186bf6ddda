//! Game session state and the interactive terminal menu.
//!
//! A [`Session`] owns the roster and the store it came from. It is created
//! once at startup, loaded once, mutated by each menu command and saved when
//! the operator leaves. [`Menu`] drives a session from any `BufRead`/`Write`
//! pair, which is stdin/stdout in the binary and byte buffers in tests.

use std::io::{BufRead, Write};

use tracing::{error, info, warn};

use crate::error::Result;
use crate::roster::{parse_level, Archetype, Character, Master, Principal, Roster};
use crate::storage::{LoadOutcome, RosterStore};

// ─────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────

/// Roster plus the file it is persisted to.
#[derive(Debug)]
pub struct Session {
    roster: Roster,
    store: RosterStore,
}

impl Session {
    pub fn new(roster: Roster, store: RosterStore) -> Self {
        Self { roster, store }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    /// Persist the roster to the session's store.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.roster)
    }
}

// ─────────────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────────────

const MENU: &str = "\nSistema de Gerenciamento do Jogo
1. Adicionar Personagem
2. Remover Personagem
3. Adicionar Mestre
4. Listar Personagens
5. Listar Mestres
6. Autenticar Usuário
7. Sair";

/// Numbered menu over an input and an output stream.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Load the roster from `store` and wrap it in a session.
    ///
    /// A missing file or malformed content is reported to the operator and
    /// the session starts empty. Malformed files are first copied to
    /// `<path>.bak` so the save on exit cannot destroy them. Any other
    /// failure is returned.
    pub fn open_session(&mut self, store: RosterStore) -> Result<Session> {
        let roster = match store.load() {
            Ok(LoadOutcome::Loaded(roster)) => roster,
            Ok(LoadOutcome::Missing) => {
                writeln!(self.output, "Arquivo não encontrado. Nenhum dado carregado.")?;
                Roster::new()
            }
            Err(e) if e.is_recoverable() => {
                error!(error = %e.format_for_log(), path = %store.path().display(), "Failed to load roster");
                writeln!(self.output, "Erro ao carregar dados: {}", e)?;

                let backup = store.backup()?;
                warn!(backup = %backup.display(), "Unreadable save file preserved");
                writeln!(self.output, "Arquivo original preservado em {}.", backup.display())?;
                Roster::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Session::new(roster, store))
    }

    /// Run the menu until the operator picks "Sair" or input ends.
    ///
    /// Both ways out save the roster.
    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;

            let choice = match self.prompt("Escolha uma opção: ")? {
                Some(choice) => choice,
                None => {
                    info!("Input closed, leaving menu");
                    return self.exit(session);
                }
            };

            match choice.trim() {
                "1" => self.add_character(session)?,
                "2" => self.remove_character(session)?,
                "3" => self.add_master(session)?,
                "4" => self.list_characters(session)?,
                "5" => self.list_masters(session)?,
                "6" => self.authenticate(session)?,
                "7" => return self.exit(session),
                _ => writeln!(self.output, "Opção inválida :( Tente novamente!")?,
            }
        }
    }

    /// Consume the menu, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a prompt and read one line without its line terminator.
    /// `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn add_character(&mut self, session: &mut Session) -> Result<()> {
        let Some(name) = self.prompt("Nome do Personagem: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Senha do Personagem: ")? else {
            return Ok(());
        };
        let Some(archetype) =
            self.prompt("Classe do Personagem (Guerreiro, Mago, Arqueiro, Ladino): ")?
        else {
            return Ok(());
        };
        let Some(level) = self.prompt("Nível do Personagem: ")? else {
            return Ok(());
        };

        let level = match parse_level(&level) {
            Ok(level) => level,
            Err(e) => {
                warn!(error = %e.format_for_log(), "Rejected character level");
                writeln!(self.output, "Erro: {}", e)?;
                return Ok(());
            }
        };

        let archetype = match archetype.parse::<Archetype>() {
            Ok(archetype) => archetype,
            Err(e) => {
                warn!(error = %e.format_for_log(), "Rejected character archetype");
                writeln!(self.output, "Classe inválida.")?;
                return Ok(());
            }
        };

        let character = Character::new(name, password, archetype, level)?;
        session.roster_mut().add_character(character);
        writeln!(self.output, "Personagem adicionado com sucesso.")?;
        Ok(())
    }

    fn remove_character(&mut self, session: &mut Session) -> Result<()> {
        let Some(name) = self.prompt("Nome do Personagem a remover: ")? else {
            return Ok(());
        };

        if session.roster_mut().remove_character(&name) == 0 {
            writeln!(self.output, "Nenhum personagem encontrado com esse nome.")?;
        } else {
            writeln!(self.output, "Personagem removido com sucesso.")?;
        }
        Ok(())
    }

    fn add_master(&mut self, session: &mut Session) -> Result<()> {
        let Some(name) = self.prompt("Nome do Mestre: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Senha do Mestre: ")? else {
            return Ok(());
        };

        session.roster_mut().add_master(Master::new(name, password));
        writeln!(self.output, "Mestre adicionado com sucesso.")?;
        Ok(())
    }

    fn list_characters(&mut self, session: &Session) -> Result<()> {
        let characters = session.roster().characters();
        if characters.is_empty() {
            writeln!(self.output, "Nenhum personagem cadastrado.")?;
        }
        for character in characters {
            writeln!(self.output, "{}", character.describe())?;
        }
        Ok(())
    }

    fn list_masters(&mut self, session: &Session) -> Result<()> {
        let masters = session.roster().masters();
        if masters.is_empty() {
            writeln!(self.output, "Nenhum mestre cadastrado.")?;
        }
        for master in masters {
            writeln!(self.output, "{}", master.name())?;
        }
        Ok(())
    }

    fn authenticate(&mut self, session: &Session) -> Result<()> {
        let Some(name) = self.prompt("Nome do Usuário: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Senha do Usuário: ")? else {
            return Ok(());
        };

        match session.roster().authenticate(&name, &password) {
            Some(Principal::Master(master)) => {
                info!(name = %master.name(), "Master authenticated");
                writeln!(self.output, "{}", master.welcome_page())?;
            }
            Some(Principal::Character(character)) => {
                info!(name = %character.name(), "Character authenticated");
                writeln!(
                    self.output,
                    "Autenticação bem-sucedida para o personagem {}.",
                    character.name()
                )?;
            }
            None => {
                info!(name = %name, "Authentication failed");
                writeln!(self.output, "Autenticação falhou.")?;
            }
        }
        Ok(())
    }

    fn exit(&mut self, session: &Session) -> Result<()> {
        session.save()?;
        writeln!(self.output, "Dados salvos.")?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Run a full menu session over `script`, returning stdout and the session.
    fn run_script(store: RosterStore, script: &str) -> (String, Session) {
        let mut menu = Menu::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut session = menu.open_session(store).unwrap();
        menu.run(&mut session).unwrap();
        let output = String::from_utf8(menu.into_output()).unwrap();
        (output, session)
    }

    fn temp_store() -> (RosterStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = RosterStore::new(tmp.path().join("dados_jogo.txt"));
        (store, tmp)
    }

    #[test]
    fn test_missing_file_reports_and_starts_empty() {
        let (store, _tmp) = temp_store();
        let (output, session) = run_script(store, "7\n");
        assert!(output.contains("Arquivo não encontrado. Nenhum dado carregado."));
        assert!(session.roster().is_empty());
        assert!(output.contains("Dados salvos."));
    }

    #[test]
    fn test_add_and_list_character() {
        let (store, _tmp) = temp_store();
        let (output, session) = run_script(store, "1\nAria\npw\nMago\n3\n4\n7\n");

        assert!(output.contains("Personagem adicionado com sucesso."));
        assert!(output.contains("Nome: Aria, Classe: Mago, Nível: 3"));
        assert_eq!(session.roster().character_count(), 1);
    }

    #[test]
    fn test_unknown_archetype_is_rejected() {
        let (store, _tmp) = temp_store();
        let (output, session) = run_script(store, "1\nMorg\npw\nNecromante\n5\n7\n");

        assert!(output.contains("Classe inválida."));
        assert_eq!(session.roster().character_count(), 0);
    }

    #[test]
    fn test_bad_level_is_rejected() {
        let (store, _tmp) = temp_store();
        let (output, session) = run_script(store, "1\nAria\npw\nMago\nzero\n1\nAria\npw\nMago\n0\n7\n");

        assert_eq!(output.matches("Erro: O nível deve ser").count(), 2);
        assert_eq!(session.roster().character_count(), 0);
        // Menu redisplays after each rejection
        assert_eq!(output.matches("Sistema de Gerenciamento do Jogo").count(), 3);
    }

    #[test]
    fn test_remove_all_named_characters() {
        let (store, _tmp) = temp_store();
        let script = "1\nBob\na\nGuerreiro\n1\n\
                      1\nBob\nb\nLadino\n2\n\
                      1\nAmy\nc\nArqueiro\n1\n\
                      2\nBob\n2\nBob\n7\n";
        let (output, session) = run_script(store, script);

        assert!(output.contains("Personagem removido com sucesso."));
        assert!(output.contains("Nenhum personagem encontrado com esse nome."));
        let names: Vec<_> = session.roster().characters().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Amy"]);
    }

    #[test]
    fn test_authenticate_master_takes_precedence() {
        let (store, _tmp) = temp_store();
        let script = "1\nRex\npw1\nGuerreiro\n1\n3\nRex\npw1\n6\nRex\npw1\n7\n";
        let (output, _) = run_script(store, script);
        assert!(output.contains("Bem-vindo à página do Mestre!"));
        assert!(!output.contains("Autenticação bem-sucedida"));
    }

    #[test]
    fn test_authenticate_character_and_failure() {
        let (store, _tmp) = temp_store();
        let script = "1\nAria\npw\nMago\n2\n6\nAria\npw\n6\nAria\nnope\n7\n";
        let (output, _) = run_script(store, script);
        assert!(output.contains("Autenticação bem-sucedida para o personagem Aria."));
        assert!(output.contains("Autenticação falhou."));
    }

    #[test]
    fn test_list_masters() {
        let (store, _tmp) = temp_store();
        let (output, _) = run_script(store, "5\n3\nRex\npw\n3\nAna\nx\n5\n7\n");
        assert!(output.contains("Nenhum mestre cadastrado."));
        let rex = output.rfind("Rex\n").unwrap();
        let ana = output.rfind("Ana\n").unwrap();
        assert!(rex < ana);
    }

    #[test]
    fn test_invalid_option() {
        let (store, _tmp) = temp_store();
        let (output, _) = run_script(store, "9\nabc\n7\n");
        assert_eq!(output.matches("Opção inválida :( Tente novamente!").count(), 2);
    }

    #[test]
    fn test_exit_saves_roster() {
        let (store, tmp) = temp_store();
        run_script(store, "1\nAria\npw\nMago\n3\n3\nRex\npw1\n7\n");

        let saved = fs::read_to_string(tmp.path().join("dados_jogo.txt")).unwrap();
        assert_eq!(saved, "Personagens:\nAria,pw,Mago,3\nMestres:\nRex,pw1\n");
    }

    #[test]
    fn test_end_of_input_saves() {
        let (store, tmp) = temp_store();
        // Input ends in the middle of adding a master
        let (output, session) = run_script(store, "3\nRex\npw\n3\nAna");

        assert_eq!(session.roster().master_count(), 1);
        assert!(output.ends_with("Dados salvos.\n"));
        assert!(tmp.path().join("dados_jogo.txt").exists());
    }

    #[test]
    fn test_loaded_roster_is_used() {
        let (store, _tmp) = temp_store();
        fs::write(store.path(), "Personagens:\nAria,pw,Ladino,7\nMestres:\nRex,pw1\n").unwrap();

        let (output, session) = run_script(store, "4\n7\n");
        assert!(!output.contains("Arquivo não encontrado"));
        assert!(output.contains("Nome: Aria, Classe: Ladino, Nível: 7"));
        assert_eq!(session.roster().master_count(), 1);
    }

    #[test]
    fn test_malformed_file_reported_and_session_continues() {
        let (store, _tmp) = temp_store();
        fs::write(store.path(), "Personagens:\nAria,pw,Ladino\n").unwrap();

        let (output, session) = run_script(store, "7\n");
        assert!(output.contains("Erro ao carregar dados:"));
        assert!(output.contains("Malformed line 2"));
        assert!(session.roster().is_empty());
    }

    #[test]
    fn test_malformed_file_is_backed_up_before_save() {
        let (store, tmp) = temp_store();
        let original = "Personagens:\nAria,pw,Mago,3\nBorin,axe,Guerreiro\nMestres:\nRex,pw1\n";
        fs::write(store.path(), original).unwrap();

        let (output, _) = run_script(store, "3\nAna\nx\n7\n");
        assert!(output.contains("Arquivo original preservado em"));

        let backup = fs::read_to_string(tmp.path().join("dados_jogo.txt.bak")).unwrap();
        assert_eq!(backup, original);
        let saved = fs::read_to_string(tmp.path().join("dados_jogo.txt")).unwrap();
        assert_eq!(saved, "Personagens:\nMestres:\nAna,x\n");
    }

    #[test]
    fn test_non_utf8_file_reported_and_session_continues() {
        let (store, tmp) = temp_store();
        fs::write(store.path(), b"Personagens:\nJos\xe9,pw,Mago,3\n").unwrap();

        let (output, session) = run_script(store, "4\n7\n");
        assert!(output.contains("Erro ao carregar dados:"));
        assert!(output.contains("Malformed line 2"));
        assert!(output.contains("Nenhum personagem cadastrado."));
        assert!(session.roster().is_empty());
        assert_eq!(
            fs::read(tmp.path().join("dados_jogo.txt.bak")).unwrap(),
            b"Personagens:\nJos\xe9,pw,Mago,3\n"
        );
    }

    #[test]
    fn test_crlf_input_is_accepted() {
        let (store, _tmp) = temp_store();
        let (_, session) = run_script(store, "1\r\nAria\r\npw\r\nMago\r\n3\r\n7\r\n");
        let c = &session.roster().characters()[0];
        assert_eq!(c.name(), "Aria");
        assert!(c.authenticate("pw"));
    }
}
