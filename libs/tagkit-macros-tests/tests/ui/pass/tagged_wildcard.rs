use tagkit::Tagged;
use tagkit_macros::tagged;

#[tagged(tagkit::Any)]
struct WildcardStore;

fn main() {
    assert!(WildcardStore::tags().is_any());
}
