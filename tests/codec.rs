use chirpy::engine::codec::{decode, encode};
use chirpy::{Chirp, LastIds, StoreImage, User};
use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;

fn chirp_strategy() -> impl Strategy<Value = (String, u64)> {
    (".{0,140}", 0u64..1_000)
}

fn user_strategy() -> impl Strategy<Value = (String, String, bool)> {
    ("[a-z]{1,12}@[a-z]{1,8}\\.com", "\\PC{0,60}", any::<bool>())
}

prop_compose! {
    fn image_strategy()(
        chirps in btree_map(1u64..10_000, chirp_strategy(), 0..20),
        users in vec(user_strategy(), 0..10),
        revoke_tokens in btree_set("[A-Za-z0-9._-]{1,40}", 0..10),
        extra in 0u64..5,
    ) -> StoreImage {
        let chirps = chirps
            .into_iter()
            .map(|(id, (body, author_id))| (id, Chirp { id, body, author_id }))
            .collect::<std::collections::BTreeMap<_, _>>();
        let users = users
            .into_iter()
            .enumerate()
            .map(|(i, (email, password, is_chirpy_red))| {
                let id = i as u64 + 1;
                (id, User { id, email, password, is_chirpy_red })
            })
            .collect::<std::collections::BTreeMap<_, _>>();
        let last_ids = LastIds {
            chirps: chirps.keys().next_back().copied().unwrap_or(0) + extra,
            users: users.len() as u64,
        };
        StoreImage { chirps, users, revoke_tokens, last_ids }
    }
}

proptest! {
    #[test]
    fn decode_reproduces_encoded_image(image in image_strategy()) {
        let bytes = encode(&image).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn encoding_is_deterministic(image in image_strategy()) {
        prop_assert_eq!(encode(&image).unwrap(), encode(&image.clone()).unwrap());
    }
}
