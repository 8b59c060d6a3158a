use tagkit::Tagged;
use tagkit_macros::tagged;

struct DbPrimary;
struct DbReplica;

#[tagged(DbPrimary, DbReplica)]
struct MirroredStore;

fn main() {
    let tags = MirroredStore::tags();
    assert_eq!(tags.len(), 2);
    assert!(tags.contains::<DbPrimary>());
}
