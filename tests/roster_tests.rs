//! Roster behaviour through the public library API

use attrpg::storage::{decode, encode};
use attrpg::{Archetype, Character, Error, LoadOutcome, Master, Principal, Roster, RosterStore};
use tempfile::TempDir;

fn character(name: &str, password: &str, archetype: Archetype, level: u64) -> Character {
    Character::new(name, password, archetype, level).unwrap()
}

#[test]
fn test_level_up_is_strictly_monotonic() {
    let mut c = character("Aria", "pw", Archetype::Mage, 1);
    for expected in 2..=50 {
        c.level_up();
        assert_eq!(c.level(), expected);
    }
}

#[test]
fn test_describe_template() {
    let c = character("Aria", "pw", Archetype::Mage, 3);
    assert_eq!(c.describe(), "Nome: Aria, Classe: Mago, Nível: 3");

    for archetype in Archetype::all() {
        let c = character("Zed", "pw", *archetype, 10);
        assert_eq!(
            c.describe(),
            format!("Nome: Zed, Classe: {}, Nível: 10", archetype.label())
        );
    }
}

#[test]
fn test_save_load_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = RosterStore::new(tmp.path().join("dados_jogo.txt"));

    let mut roster = Roster::new();
    for (i, archetype) in Archetype::all().iter().enumerate() {
        roster.add_character(character(&format!("Hero{}", i), "segredo", *archetype, i as u64 + 1));
    }
    roster.add_character(character("Hero0", "outra", Archetype::Rogue, 99));
    roster.add_master(Master::new("Rex", "pw1"));
    roster.add_master(Master::new("Rex", "pw2"));

    store.save(&roster).unwrap();
    match store.load().unwrap() {
        LoadOutcome::Loaded(loaded) => assert_eq!(loaded, roster),
        LoadOutcome::Missing => panic!("save file should exist"),
    }
}

#[test]
fn test_master_wins_over_character_with_same_credentials() {
    let mut roster = Roster::new();
    roster.add_master(Master::new("Rex", "pw1"));
    roster.add_character(character("Rex", "pw1", Archetype::Warrior, 1));

    assert!(matches!(roster.authenticate("Rex", "pw1"), Some(Principal::Master(_))));
}

#[test]
fn test_remove_all_bobs() {
    let mut roster = Roster::new();
    roster.add_character(character("Bob", "a", Archetype::Warrior, 1));
    roster.add_character(character("Bob", "b", Archetype::Archer, 2));

    roster.remove_character("Bob");
    assert_eq!(roster.characters().iter().filter(|c| c.name() == "Bob").count(), 0);
}

#[test]
fn test_missing_file_loads_empty() {
    let tmp = TempDir::new().unwrap();
    let outcome = RosterStore::new(tmp.path().join("ausente.txt")).load().unwrap();
    assert!(matches!(outcome, LoadOutcome::Missing));
    assert!(outcome.into_roster().is_empty());
}

#[test]
fn test_unrecognized_archetype_rejected() {
    let mut roster = Roster::new();
    let parsed = "Necromante".parse::<Archetype>();
    assert!(matches!(parsed, Err(Error::UnknownArchetype { .. })));
    if let Ok(archetype) = parsed {
        roster.add_character(character("Morg", "pw", archetype, 1));
    }
    assert_eq!(roster.character_count(), 0);
}

#[test]
fn test_encode_decode_text_round_trip() {
    let text = "Personagens:\nAria,pw,Ladino,4\nMestres:\nRex,pw1\n";
    assert_eq!(encode(&decode(text).unwrap()), text);
}
