use super::*;
use crate::testing::ParkedLoader;

fn piece(letter: char) -> Piece {
    Piece::new(letter).expect("letter")
}

fn cache() -> (Rc<ParkedLoader>, PieceImageCache<Rc<ParkedLoader>>) {
    let loader = Rc::new(ParkedLoader::default());
    let cache = PieceImageCache::new(Rc::clone(&loader));
    (loader, cache)
}

// =============================================================
// asset_path
// =============================================================

#[test]
fn asset_path_uses_color_prefix_and_uppercase_letter() {
    assert_eq!(asset_path(piece('K')).as_deref(), Some("/pieces/wK.svg"));
    assert_eq!(asset_path(piece('p')).as_deref(), Some("/pieces/bP.svg"));
    assert_eq!(asset_path(piece('c')).as_deref(), Some("/pieces/bC.svg"));
}

#[test]
fn asset_path_none_for_unknown_letter() {
    assert!(asset_path(piece('x')).is_none());
    assert!(asset_path(piece('Z')).is_none());
}

// =============================================================
// get_or_create
// =============================================================

#[test]
fn first_reference_starts_one_load() {
    let (loader, cache) = cache();
    let entry = cache.get_or_create(piece('Q')).expect("known piece");
    assert_eq!(entry.state(), LoadState::Pending);
    assert!(entry.ready().is_none());
    assert_eq!(*loader.started.borrow(), vec!["/pieces/wQ.svg".to_owned()]);
    assert_eq!(cache.loads_started(), 1);
}

#[test]
fn repeated_references_share_one_entry() {
    let (loader, cache) = cache();
    let a = cache.get_or_create(piece('n')).expect("known piece");
    let b = cache.get_or_create(piece('n')).expect("known piece");
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(loader.started.borrow().len(), 1);
}

#[test]
fn keys_are_case_sensitive() {
    let (_loader, cache) = cache();
    cache.get_or_create(piece('n'));
    cache.get_or_create(piece('N'));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.loads_started(), 2);
}

#[test]
fn unknown_piece_creates_nothing() {
    let (loader, cache) = cache();
    assert!(cache.get_or_create(piece('x')).is_none());
    assert!(cache.is_empty());
    assert!(loader.started.borrow().is_empty());
}

#[test]
fn successful_load_marks_ready() {
    let (loader, cache) = cache();
    let entry = cache.get_or_create(piece('k')).expect("known piece");
    loader.settle_all(true);
    assert_eq!(entry.state(), LoadState::Ready);
    assert_eq!(entry.ready().map(String::as_str), Some("/pieces/bK.svg"));
}

#[test]
fn failed_load_is_remembered_without_retry() {
    let (loader, cache) = cache();
    let entry = cache.get_or_create(piece('k')).expect("known piece");
    loader.settle_all(false);
    assert_eq!(entry.state(), LoadState::Failed);
    assert!(entry.ready().is_none());

    cache.get_or_create(piece('k'));
    assert_eq!(cache.loads_started(), 1);
}

// =============================================================
// subscribe
// =============================================================

#[test]
fn listeners_hear_successful_loads() {
    let (loader, cache) = cache();
    let heard = Rc::new(RefCell::new(Vec::new()));
    let heard_in = Rc::clone(&heard);
    let listener: Rc<LoadListener> = Rc::new(move |letter| heard_in.borrow_mut().push(letter));
    cache.subscribe(&listener);

    cache.get_or_create(piece('B'));
    cache.get_or_create(piece('r'));
    loader.settle_all(true);

    assert_eq!(*heard.borrow(), vec!['B', 'r']);
}

#[test]
fn listeners_do_not_hear_failures() {
    let (loader, cache) = cache();
    let count = Rc::new(Cell::new(0));
    let count_in = Rc::clone(&count);
    let listener: Rc<LoadListener> = Rc::new(move |_| count_in.set(count_in.get() + 1));
    cache.subscribe(&listener);

    cache.get_or_create(piece('B'));
    loader.settle_all(false);
    assert_eq!(count.get(), 0);
}

#[test]
fn dropped_listener_is_not_called() {
    let (loader, cache) = cache();
    let count = Rc::new(Cell::new(0));
    let count_in = Rc::clone(&count);
    let listener: Rc<LoadListener> = Rc::new(move |_| count_in.set(count_in.get() + 1));
    cache.subscribe(&listener);
    drop(listener);

    cache.get_or_create(piece('B'));
    loader.settle_all(true);
    assert_eq!(count.get(), 0);
}
