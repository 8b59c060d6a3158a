use tagkit::{tag_set, TagSet};
use tagkit_macros::tag_alias;

struct DbPrimary;
struct DbReplica;

#[tag_alias(DbPrimary, DbReplica)]
struct AllDatabases;

fn main() {
    let set = TagSet::new().with_alias::<AllDatabases>();
    assert_eq!(set, tag_set![DbPrimary, DbReplica]);
}
