/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Ring signatures and linkable ring signatures over secp256k1 and ed25519.
//!
//! A ring signature proves that a message was signed by one of a set of public keys,
//! without revealing which one.
//! Linkable signatures additionally carry a key image,
//! so that two signatures made with the same key (under the same flag) can be recognized.

#[macro_use]
extern crate lazy_static;


//internal modules
mod codec;
pub use codec::is_base64;
mod tobytes;
#[cfg(feature = "to_bytes")]
pub use tobytes::ToBytes;


//uncommon public modules
pub mod scalar;
pub mod hashes;


//"normal" public modules
pub mod errors;
pub mod config;
pub mod curve;
pub mod point;
pub mod ring;
pub mod signature;


pub mod common {
    //! Re-exports of the signing API: errors, config, curves, points, rings and signatures.
    //! The tests and benches import everything through `ringsig::common::*`.

    pub use crate::{
        errors::*, config::*, curve::*, point::*, ring::*, signature::*
    };
    #[cfg(feature = "to_bytes")]
    pub use crate::tobytes::ToBytes;
}


mod internal_common {
    //! `common`, plus the hashing and integer helpers used across the crate.

    pub use crate::{
        common::*, hashes::*, scalar::*
    };
}
