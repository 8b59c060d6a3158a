use tagkit::Tagged;
use tagkit_macros::tagged;

#[tagged]
struct PlainStore;

fn main() {
    assert!(PlainStore::tags().is_empty());
}
