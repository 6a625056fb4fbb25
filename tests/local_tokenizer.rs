use toktool::local::{BOS_TOKEN, EOS_TOKEN};
use toktool::{Error, LocalTokenizer, Tokenizer, Vocabulary};

const DELIMITERS: &[&str] = &[",", ".", ":", ";", "?", "_", "!", "\"", "(", ")", "'", "--"];

#[test]
fn ids_are_stable_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");

    let first = {
        let mut tok = LocalTokenizer::open(&path).unwrap();
        tok.encode("It was the best of times, it was the worst of times.")
            .unwrap()
    };

    let mut tok = LocalTokenizer::open(&path).unwrap();
    assert!(!tok.is_dirty());
    let size = tok.vocabulary().len();
    let again = tok
        .encode("It was the best of times, it was the worst of times.")
        .unwrap();
    assert_eq!(first, again);
    assert_eq!(tok.vocabulary().len(), size);

    // "was" keeps its id everywhere.
    let was = tok.vocabulary().id_of("was").unwrap();
    assert_eq!(tok.encode("was").unwrap(), vec![0, was, 1]);
}

#[test]
fn decode_is_framed_by_markers() {
    let dir = tempfile::tempdir().unwrap();
    let mut tok = LocalTokenizer::open(dir.path().join("vocab.json")).unwrap();

    for text in [
        "",
        "plain",
        "Call me Ishmael. Some years ago--never mind how long",
        "  \"Quoted\" (parenthesised); colon: done!  ",
    ] {
        let ids = tok.encode(text).unwrap();
        let decoded = tok.decode(&ids).unwrap();
        assert!(decoded.starts_with(BOS_TOKEN), "{decoded:?}");
        assert!(decoded.ends_with(EOS_TOKEN), "{decoded:?}");
        assert!(!decoded.contains(char::is_whitespace), "{decoded:?}");

        // Every delimiter occurrence became its own token.
        for &id in &ids {
            let token = tok.vocabulary().token_of(id).unwrap();
            if !DELIMITERS.contains(&token) && token != BOS_TOKEN && token != EOS_TOKEN {
                for delim in DELIMITERS {
                    assert!(!token.contains(delim), "{token:?} contains {delim:?}");
                }
            }
        }
    }
}

#[test]
fn vocabulary_file_matches_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");
    let mut tok = LocalTokenizer::open(&path).unwrap();

    tok.encode("one two, three").unwrap();
    tok.encode("three four").unwrap();

    let on_disk = Vocabulary::load(&path).unwrap().unwrap();
    assert_eq!(&on_disk, tok.vocabulary());
    assert_eq!(
        on_disk.iter().collect::<Vec<_>>(),
        vec![BOS_TOKEN, EOS_TOKEN, "one", "two", ",", "three", "four"]
    );
}

#[test]
fn existing_vocabulary_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");
    std::fs::write(&path, r#"["<|BOS|>", "<|EOS|>", "hello", "world"]"#).unwrap();

    let mut tok = LocalTokenizer::open(&path).unwrap();
    assert_eq!(tok.encode("world hello").unwrap(), vec![0, 3, 2, 1]);
    assert_eq!(tok.decode(&[2, 3]).unwrap(), "helloworld");
}

#[test]
fn failed_save_keeps_new_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("vocab");
    let path = parent.join("vocab.json");
    let mut tok = LocalTokenizer::open(&path).unwrap();

    // Replace the vocabulary directory with a plain file.
    std::fs::remove_dir_all(&parent).unwrap();
    std::fs::write(&parent, b"").unwrap();

    match tok.encode("fresh") {
        Err(Error::Io { .. }) => {}
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(tok.is_dirty());
    assert_eq!(tok.vocabulary().id_of("fresh"), Some(2));
    assert_eq!(tok.decode(&[2]).unwrap(), "fresh");

    std::fs::remove_file(&parent).unwrap();
    tok.save().unwrap();
    assert!(!tok.is_dirty());
    assert_eq!(Vocabulary::load(&path).unwrap().unwrap().len(), 3);
}

#[cfg(unix)]
#[test]
fn growing_keeps_shared_file_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");
    std::fs::write(&path, r#"["<|BOS|>", "<|EOS|>"]"#).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let mut tok = LocalTokenizer::open(&path).unwrap();
    assert_eq!(tok.encode("hi").unwrap(), vec![0, 2, 1]);

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
