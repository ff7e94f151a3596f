#![no_main]

use libfuzzer_sys::fuzz_target;
use lrudict::ds::PurgeQueue;

// Fuzz arbitrary append/claim/reclaim sequences on PurgeQueue
//
// Checks cursor bookkeeping and that claims deliver exactly the appended
// entries in order.
fuzz_target!(|data: &[u8]| {
    let mut queue: PurgeQueue<u8> = PurgeQueue::new();
    let mut appended: Vec<u8> = Vec::new();
    let mut claimed: Vec<u8> = Vec::new();

    for chunk in data.chunks(2) {
        let op = chunk[0] % 4;
        let value = *chunk.get(1).unwrap_or(&0);

        match op {
            0 | 1 => {
                queue.append(value);
                appended.push(value);
            }
            2 => {
                claimed.extend(queue.claim());
            }
            3 => {
                queue.reclaim();
            }
            _ => unreachable!(),
        }

        queue.debug_validate_invariants();
        assert!(queue.head() <= queue.tail());
        assert_eq!(queue.len(), appended.len() - claimed.len());
    }

    claimed.extend(queue.claim());
    assert_eq!(claimed, appended);
});
