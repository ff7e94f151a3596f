#![no_main]

use libfuzzer_sys::fuzz_target;
use lrudict::dict::LruDict;

// Fuzz arbitrary operation sequences on LruDict
//
// Tests random sequences of insert, get, get_or_insert, contains, remove,
// pop, pop_mru/pop_lru, peek, resize, clear, and purge against the
// container's own bookkeeping.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 32).max(1);
    let dict: LruDict<u8, u8> = match LruDict::new(capacity) {
        Ok(dict) => dict,
        Err(_) => return,
    };
    let mut capacity = capacity;

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 12;
        let key = data[idx + 1];
        let value = data[idx + 2];

        match op {
            0 => {
                dict.insert(key, value).unwrap();
            }
            1 => {
                let _ = dict.get(&key);
            }
            2 => {
                let _ = dict.get_or(&key, value);
            }
            3 => {
                let _ = dict.get_or_insert(key, value);
            }
            4 => {
                let _ = dict.contains(&key);
            }
            5 => {
                let _ = dict.remove(&key);
            }
            6 => {
                let _ = dict.pop(&key);
            }
            7 => {
                let _ = dict.pop_mru();
            }
            8 => {
                let _ = dict.pop_lru();
            }
            9 => {
                let _ = dict.peek_lru();
            }
            10 => {
                let new_capacity = (key as usize % 32).max(1);
                dict.resize(new_capacity).unwrap();
                capacity = new_capacity;
            }
            11 => {
                if value % 16 == 0 {
                    dict.clear().unwrap();
                } else {
                    let _ = dict.purge();
                }
            }
            _ => unreachable!(),
        }

        assert!(dict.len() <= capacity);
        assert_eq!(dict.keys().len(), dict.len());

        idx += 3;
    }
});
