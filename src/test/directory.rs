use crate::{
    hash_directory,
    test::{readers, usecase::*},
    DirectoryHasher, DirectorySignatureMap, Filter, JobType, Options, ReadingStrategy,
    SignatureAlgorithm, Tolerance, E,
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{atomic::Ordering, mpsc},
    thread,
    time::Duration,
};

#[test]
fn scenario() -> Result<(), E> {
    let usecase = UseCase::layout(&[("a.txt", b"hello"), ("sub/b.txt", b"world")])?;
    let flat = DirectoryHasher::new(&usecase.root, false)?.hash(SignatureAlgorithm::Md5)?;
    assert_eq!(flat.len(), 1);
    assert_eq!(
        flat.get(usecase.root.join("a.txt")).map(|s| s.to_hex()),
        Some(String::from("5d41402abc4b2a76b9719d911017c592"))
    );
    let deep = DirectoryHasher::new(&usecase.root, true)?.hash(SignatureAlgorithm::Md5)?;
    let expected: BTreeMap<PathBuf, String> = [
        (
            usecase.root.join("a.txt"),
            String::from("5d41402abc4b2a76b9719d911017c592"),
        ),
        (
            usecase.root.join("sub").join("b.txt"),
            String::from("7d793037a0760186574b0282f2f435e7"),
        ),
    ]
    .into_iter()
    .collect();
    let received: BTreeMap<PathBuf, String> = deep
        .into_iter()
        .map(|(path, signature)| (path, signature.to_hex()))
        .collect();
    assert_eq!(received, expected);
    usecase.clean()?;
    Ok(())
}

#[test]
fn recursive() -> Result<(), E> {
    let usecase = UseCase::gen(3, 4, 2)?;
    assert_eq!(usecase.files.len(), expectation(3, 4, 2));
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Sha1)?;
    assert_eq!(signatures.len(), usecase.files.len());
    for filename in usecase.files.iter() {
        assert!(signatures.contains(filename));
    }
    for path in signatures.paths() {
        assert!(path.is_file());
    }
    usecase.clean()?;
    Ok(())
}

#[test]
fn not_recursive() -> Result<(), E> {
    let usecase = UseCase::gen(3, 4, 1)?;
    let top_level = usecase.top_level();
    let signatures = hash_directory(&usecase.root, false, SignatureAlgorithm::Md5)?;
    assert_eq!(signatures.len(), top_level.len());
    for filename in top_level {
        assert!(signatures.contains(filename));
    }
    usecase.clean()?;
    Ok(())
}

#[test]
fn ordered_by_path() -> Result<(), E> {
    let usecase = UseCase::gen(2, 5, 1)?;
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5)?;
    let paths: Vec<&PathBuf> = signatures.paths().collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    usecase.clean()?;
    Ok(())
}

#[test]
fn component_order() -> Result<(), E> {
    let usecase = UseCase::layout(&[("a.txt", b"a"), ("a/b.txt", b"b")])?;
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5)?;
    let paths: Vec<&PathBuf> = signatures.paths().collect();
    // Byte order would put "a.txt" first, as '.' < '/'
    assert_eq!(
        paths,
        vec![
            &usecase.root.join("a").join("b.txt"),
            &usecase.root.join("a.txt")
        ]
    );
    usecase.clean()?;
    Ok(())
}

#[test]
fn correction() -> Result<(), E> {
    let usecase = UseCase::gen(3, 5, 2)?;
    let mut hasher = Options::from(&usecase.root)?.recursive(true).hasher();
    let a = hasher.hash(SignatureAlgorithm::Blake3)?;
    let b = hasher.hash(SignatureAlgorithm::Blake3)?;
    assert_eq!(a, b);
    assert_eq!(
        a.digest(SignatureAlgorithm::Sha256)?,
        b.digest(SignatureAlgorithm::Sha256)?
    );
    usecase.clean()?;
    Ok(())
}

#[test]
fn changes() -> Result<(), E> {
    let usecase = UseCase::gen(3, 5, 1)?;
    let mut hasher = DirectoryHasher::new(&usecase.root, true)?;
    let a = hasher.hash(SignatureAlgorithm::Md5)?;
    usecase.change(5)?;
    let b = hasher.hash(SignatureAlgorithm::Md5)?;
    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
    assert_ne!(
        a.digest(SignatureAlgorithm::Md5)?,
        b.digest(SignatureAlgorithm::Md5)?
    );
    usecase.clean()?;
    Ok(())
}

#[test]
fn tree_digest() -> Result<(), E> {
    let usecase = UseCase::layout(&[("a.txt", b"hello"), ("sub/b.txt", b"world")])?;
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5)?;
    let chunks: Vec<Vec<u8>> = signatures
        .iter()
        .map(|(_, signature)| signature.as_bytes().to_vec())
        .collect();
    assert_eq!(
        signatures.digest(SignatureAlgorithm::Sha1)?,
        SignatureAlgorithm::Sha1.digest(chunks.iter().map(|c| c.as_slice()))?
    );
    usecase.clean()?;
    Ok(())
}

#[test]
fn threads() -> Result<(), E> {
    let usecase = UseCase::gen(4, 6, 1)?;
    let single = Options::from(&usecase.root)?
        .recursive(true)
        .threads(1)
        .hasher()
        .hash(SignatureAlgorithm::Sha256)?;
    let multiple = Options::from(&usecase.root)?
        .recursive(true)
        .threads(4)
        .hasher()
        .hash(SignatureAlgorithm::Sha256)?;
    assert_eq!(single.len(), usecase.files.len());
    assert_eq!(single, multiple);
    assert!(matches!(
        Options::from(&usecase.root)?
            .threads(0)
            .hasher()
            .hash(SignatureAlgorithm::Sha256),
        Err(E::OptimalThreadsNumber)
    ));
    usecase.clean()?;
    Ok(())
}

#[test]
fn strategies() -> Result<(), E> {
    let usecase = UseCase::gen(3, 4, 1)?;
    let expected = hash_directory(&usecase.root, true, SignatureAlgorithm::Sha512)?;
    for strategy in [
        ReadingStrategy::Complete,
        ReadingStrategy::MemoryMapped,
        ReadingStrategy::Scenario(vec![
            (0..8, Box::new(ReadingStrategy::Buffer)),
            (8..u64::MAX, Box::new(ReadingStrategy::MemoryMapped)),
        ]),
    ] {
        let signatures = Options::from(&usecase.root)?
            .recursive(true)
            .reading_strategy(strategy)?
            .hasher()
            .hash(SignatureAlgorithm::Sha512)?;
        assert_eq!(signatures, expected);
    }
    usecase.clean()?;
    Ok(())
}

#[test]
fn missing_root() -> Result<(), E> {
    let usecase = UseCase::layout(&[("a.txt", b"hello")])?;
    let missing = usecase.root.join("missing");
    assert!(matches!(
        hash_directory(&missing, true, SignatureAlgorithm::Md5),
        Err(E::NotFound(path)) if path == missing
    ));
    assert!(matches!(
        DirectoryHasher::new(&usecase.files[0], false),
        Err(E::NotDirectory(..))
    ));
    usecase.clean()?;
    Ok(())
}

#[test]
fn empty_root() -> Result<(), E> {
    let usecase = UseCase::gen(3, 0, 2)?;
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5)?;
    assert!(signatures.is_empty());
    assert!(signatures.digest(SignatureAlgorithm::Md5)?.is_empty());
    usecase.clean()?;
    Ok(())
}

fn broken_usecase() -> Result<UseCase, E> {
    Ok(UseCase::layout(&[
        ("a.txt", b"a"),
        ("b.broken", b"b"),
        ("sub/c.txt", b"c"),
        ("sub/d.broken", b"d"),
    ])?)
}

#[test]
fn stop_on_errors() -> Result<(), E> {
    let usecase = broken_usecase()?;
    let result = Options::from(&usecase.root)?
        .recursive(true)
        .threads(1)
        .hasher()
        .hash_with::<readers::Picky>(SignatureAlgorithm::Md5);
    let Err(err) = result else {
        panic!("hashing should fail on the first broken file");
    };
    assert!(matches!(&err, E::Bound(path, _) if *path == usecase.root.join("b.broken")));
    assert!(matches!(err.cause(), E::IOError(..)));
    usecase.clean()?;
    Ok(())
}

#[test]
fn partial_failure() -> Result<(), E> {
    let usecase = broken_usecase()?;
    for tolerance in [Tolerance::LogErrors, Tolerance::DoNotLogErrors] {
        let result = Options::from(&usecase.root)?
            .recursive(true)
            .tolerance(tolerance)
            .hasher()
            .hash_with::<readers::Picky>(SignatureAlgorithm::Md5);
        let Err(E::PartialFailure(report)) = result else {
            panic!("partial failure is expected");
        };
        assert_eq!(report.signatures.len(), 2);
        assert!(report.signatures.contains(usecase.root.join("a.txt")));
        assert!(report
            .signatures
            .contains(usecase.root.join("sub").join("c.txt")));
        let mut failed: Vec<&PathBuf> = report.failures.iter().map(|(p, _)| p).collect();
        failed.sort();
        assert_eq!(
            failed,
            vec![
                &usecase.root.join("b.broken"),
                &usecase.root.join("sub").join("d.broken")
            ]
        );
        assert!(report
            .failures
            .iter()
            .all(|(_, err)| matches!(err, E::IOError(..))));
    }
    usecase.clean()?;
    Ok(())
}

/// Hashes with `readers::Exploding` on a separate thread, so a hanging scan fails the test
/// instead of blocking it.
fn hash_exploding(root: &Path, tolerance: Tolerance) -> Result<DirectorySignatureMap, E> {
    let root = root.to_path_buf();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = Options::from(&root).and_then(|mut opt| {
            let mut hasher = opt
                .recursive(true)
                .threads(2)
                .tolerance(tolerance)
                .hasher();
            hasher.hash_with::<readers::Exploding>(SignatureAlgorithm::Md5)
        });
        let _ = tx.send(result);
    });
    rx.recv_timeout(Duration::from_secs(30))
        .expect("hashing should be finished in time")
}

#[test]
fn panic_in_reader() -> Result<(), E> {
    let usecase = UseCase::layout(&[
        ("a.txt", b"a"),
        ("b.boom", b"b"),
        ("c.txt", b"c"),
        ("sub/d.boom", b"d"),
        ("sub/e.txt", b"e"),
    ])?;
    let Err(err) = hash_exploding(&usecase.root, Tolerance::StopOnErrors) else {
        panic!("hashing should fail on a panicking reader");
    };
    assert!(matches!(
        err.cause(),
        E::Panicked(path, _) if path.extension().is_some_and(|ext| ext == "boom")
    ));
    let Err(E::PartialFailure(report)) = hash_exploding(&usecase.root, Tolerance::LogErrors) else {
        panic!("partial failure is expected");
    };
    let hashed: Vec<&PathBuf> = report.signatures.paths().collect();
    assert_eq!(
        hashed,
        vec![
            &usecase.root.join("a.txt"),
            &usecase.root.join("c.txt"),
            &usecase.root.join("sub").join("e.txt")
        ]
    );
    let mut failed: Vec<&PathBuf> = report.failures.iter().map(|(p, _)| p).collect();
    failed.sort();
    assert_eq!(
        failed,
        vec![
            &usecase.root.join("b.boom"),
            &usecase.root.join("sub").join("d.boom")
        ]
    );
    assert!(report
        .failures
        .iter()
        .all(|(_, err)| matches!(
            err,
            E::Panicked(_, reason) if reason == "reader has exploded"
        )));
    usecase.clean()?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_folder() -> Result<(), E> {
    use std::{fs, os::unix::fs::PermissionsExt};
    let usecase = UseCase::layout(&[
        ("a.txt", b"a"),
        ("locked/b.txt", b"b"),
        ("open/c.txt", b"c"),
    ])?;
    let locked = usecase.root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).map_err(at(&locked))?;
    // Privileged users are able to read the folder anyway
    if fs::read_dir(&locked).is_err() {
        let Err(err) = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5) else {
            panic!("listing should fail on the locked folder");
        };
        assert!(matches!(&err, E::Bound(path, _) if *path == locked));
        assert!(matches!(err.cause(), E::AccessDenied(path) if *path == locked));
        let result = Options::from(&usecase.root)?
            .recursive(true)
            .tolerance(Tolerance::LogErrors)
            .hasher()
            .hash(SignatureAlgorithm::Md5);
        let Err(E::PartialFailure(report)) = result else {
            panic!("partial failure is expected");
        };
        let hashed: Vec<&PathBuf> = report.signatures.paths().collect();
        assert_eq!(
            hashed,
            vec![
                &usecase.root.join("a.txt"),
                &usecase.root.join("open").join("c.txt")
            ]
        );
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0],
            (path, E::AccessDenied(..)) if *path == locked
        ));
    }
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).map_err(at(&locked))?;
    usecase.clean()?;
    Ok(())
}

#[test]
fn filters() -> Result<(), E> {
    let usecase = UseCase::layout(&[
        ("a.txt", b"a"),
        ("b.log", b"b"),
        ("sub/c.txt", b"c"),
        ("target/d.txt", b"d"),
        ("sub/target/e.txt", b"e"),
    ])?;
    let signatures = Options::from(&usecase.root)?
        .recursive(true)
        .include(Filter::Files("*.txt"))?
        .exclude(Filter::Folders("target"))?
        .hasher()
        .hash(SignatureAlgorithm::Md5)?;
    let paths: Vec<&PathBuf> = signatures.paths().collect();
    assert_eq!(
        paths,
        vec![
            &usecase.root.join("a.txt"),
            &usecase.root.join("sub").join("c.txt")
        ]
    );
    usecase.clean()?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinks() -> Result<(), E> {
    use std::os::unix::fs::symlink;
    let usecase = UseCase::layout(&[("a.txt", b"hello"), ("sub/b.txt", b"world")])?;
    let link = usecase.root.join("link.txt");
    symlink(usecase.root.join("a.txt"), &link).map_err(at(&link))?;
    let dangling = usecase.root.join("dangling.txt");
    symlink(usecase.root.join("missing.txt"), &dangling).map_err(at(&dangling))?;
    // Loop: sub/up -> root
    let up = usecase.root.join("sub").join("up");
    symlink(&usecase.root, &up).map_err(at(&up))?;
    let signatures = hash_directory(&usecase.root, true, SignatureAlgorithm::Md5)?;
    assert_eq!(signatures.len(), 3);
    assert_eq!(
        signatures.get(usecase.root.join("link.txt")),
        signatures.get(usecase.root.join("a.txt"))
    );
    assert!(!signatures.contains(usecase.root.join("dangling.txt")));
    usecase.clean()?;
    Ok(())
}

#[test]
fn aborted() -> Result<(), E> {
    let usecase = UseCase::gen(2, 10, 1)?;
    let mut hasher = DirectoryHasher::new(&usecase.root, true)?;
    if let Ok(mut breaker) = readers::ABORT_ON_OPEN.lock() {
        *breaker = Some(hasher.breaker());
    }
    let result = hasher.hash_with::<readers::Aborting>(SignatureAlgorithm::Md5);
    assert!(matches!(result, Err(E::Aborted)));
    // All workers are joined, so every opened file has been closed
    let opened = readers::ABORTING_OPENED.load(Ordering::SeqCst);
    assert!(opened > 0);
    assert_eq!(readers::ABORTING_CLOSED.load(Ordering::SeqCst), opened);
    // The breaker is reset by the next call
    if let Ok(mut breaker) = readers::ABORT_ON_OPEN.lock() {
        *breaker = None;
    }
    assert_eq!(
        hasher.hash(SignatureAlgorithm::Md5)?.len(),
        usecase.files.len()
    );
    usecase.clean()?;
    Ok(())
}

#[test]
fn progress() -> Result<(), E> {
    let usecase = UseCase::gen(3, 10, 1)?;
    let mut hasher = Options::from(&usecase.root)?
        .recursive(true)
        .progress()
        .hasher();
    let rx_progress = hasher.progress().expect("progress is enabled");
    assert!(hasher.progress().is_none());
    let handle = thread::spawn(move || {
        let mut collecting = false;
        let mut last = None;
        while let Ok(tick) = rx_progress.recv() {
            match tick.job {
                JobType::Collecting => collecting = true,
                JobType::Hashing => last = Some((tick.done, tick.total)),
            }
        }
        (collecting, last)
    });
    hasher.hash(SignatureAlgorithm::Md5)?;
    let (collecting, last) = handle.join().expect("progress thread is finished");
    assert!(collecting);
    assert_eq!(last, Some((usecase.files.len(), usecase.files.len())));
    // A new channel is available for the next call
    assert!(hasher.progress().is_some());
    usecase.clean()?;
    Ok(())
}
