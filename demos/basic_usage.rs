use std::collections::BTreeMap;
use std::sync::Arc;

use mvcc_ids::CommitInstant;
use mvcc_ids::CommitInstants;
use mvcc_ids::EntryId;
use mvcc_ids::EntryVersions;
use mvcc_ids::IdentifierRegistry;
use mvcc_ids::RegistryConfig;
use mvcc_ids::VersionError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // One log shared by every entry, one registry per entry.
    let commits = Arc::new(CommitInstants::new());

    let config = RegistryConfig::default().with_identifier_bits(4);
    let registry = IdentifierRegistry::from_config(&config)?;
    let versions = EntryVersions::new(EntryId::new(1), registry, commits.clone());

    // Write and commit a few versions
    let mut committed = BTreeMap::new();
    for instant in [100, 110, 120, 130] {
        let v = versions.new_version()?;
        versions.commit(v, CommitInstant::new(instant));
        committed.insert(v, instant);
    }

    // A reader with a snapshot at 115 sees only the first two versions
    let snapshot = CommitInstant::new(115);
    for v in committed.keys() {
        println!(
            "version {} visible at {}: {}",
            v,
            snapshot,
            versions.is_visible(*v, snapshot)?
        );
    }

    // The oldest two are no longer reachable: reclaim them
    let old = committed.keys().take(2).copied().collect::<Vec<_>>();
    versions.reclaim(&old)?;
    println!("after reclaim: {:?}", versions.registry().stats());

    // Fill the 4-bit space to show exhaustion
    loop {
        match versions.new_version() {
            Ok(v) => println!("allocated {}", v),
            Err(VersionError::Exhausted(e)) => {
                println!("{}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let removed = versions.drop_entry();
    println!("entry dropped, {} commit instants removed", removed);

    Ok(())
}
