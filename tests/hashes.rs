// SPDX short identifier: Unlicense

use num_bigint::BigUint;

use ringsig::{
    common::*,
    hashes::*
};

#[test]
fn golden_digests() {
    let message: Vec<HashItem> = vec!["Hello world !".into()];

    assert_eq!(
        hash(&message, &SignatureConfig::default()).unwrap(),
        "f1eec9d69e813dd791594452da1d21b20452423e6786af96190186ec71b1ed99"
    );
    assert_eq!(
        hash(&message, &SignatureConfig{ hash: HashFunction::Sha256, evm_compatibility: false }).unwrap(),
        "2f951d3adf29ab254d734286755e2131c397b6fc1894e6ffe5b236ea5e099ecf"
    );
    assert_eq!(
        hash(&message, &SignatureConfig{ hash: HashFunction::Sha512, evm_compatibility: false }).unwrap(),
        "6389d2c21cb35908d355b7dae876df2ec9da2b5920542638bb72ddcb17c9c0a3\
         ff37c1162f5dd15d416b5817ac5957ebade91b8c5e34a03474a8e6985ba2fda9"
    );
}

#[test]
fn evm_layout() {
    let items: Vec<HashItem> = vec![BigUint::from(1u32).into(), "abc".into()];

    //keccak256(abi.encodePacked(uint256(1), "abc"))
    assert_eq!(
        hash(&items, &SignatureConfig::evm()).unwrap(),
        "0825eb20bb1db47b2468e52d35040f413a6e67478c16cc591d9e3d5c4f45aaee"
    );
    //keccak256("1abc")
    assert_eq!(
        hash(&items, &SignatureConfig::default()).unwrap(),
        "1dd354d3b2dca401d1778cab5bc60923cf18a27a2de6dfb0855b767d12ba70df"
    );
}

#[test]
fn evm_needs_keccak() {
    let config = SignatureConfig{ hash: HashFunction::Sha512, evm_compatibility: true };
    assert!(matches!(hash(&["abc".into()], &config), Err(SignatureError::InvalidParams(_))));
}

#[test]
fn scalars_are_reduced() {
    let config = SignatureConfig{ hash: HashFunction::Sha512, evm_compatibility: false };
    for curve in [Curve::Secp256k1, Curve::Ed25519] {
        for i in 0..20u32 {
            let scalar = hash_to_scalar(&[BigUint::from(i).into()], &curve, &config).unwrap();
            assert!(&scalar < curve.order());
        }
    }
}

#[test]
fn hash_to_curve_test() {
    let curve = Curve::Secp256k1;
    let a = hash_to_curve(&["abc".into()], &curve).unwrap();
    let b = hash_to_curve(&["abc".into()], &curve).unwrap();
    let c = hash_to_curve(&["abd".into()], &curve).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(curve.is_on_curve(a.x(), a.y()).unwrap());
    a.check_low_order().unwrap();

    assert!(matches!(
        hash_to_curve(&["abc".into()], &Curve::Ed25519),
        Err(SignatureError::UnsupportedCurve(_))
    ));
}

#[test]
fn key_image_test() {
    let curve = Curve::Secp256k1;
    let key = curve.random_private_key().unwrap();
    let other = curve.random_private_key().unwrap();

    //deterministic
    assert_eq!(key_image(&key, &curve, "").unwrap(), key_image(&key, &curve, "").unwrap());
    assert_eq!(key_image(&key, &curve, "flag").unwrap(), key_image(&key, &curve, "flag").unwrap());
    //separated by flag and by key
    assert_ne!(key_image(&key, &curve, "").unwrap(), key_image(&key, &curve, "flag").unwrap());
    assert_ne!(key_image(&key, &curve, "flag").unwrap(), key_image(&other, &curve, "flag").unwrap());

    //I = k * H(P, flag)
    let public_key = derive_public_key(&key, &curve).unwrap();
    assert_eq!(
        key_image(&key, &curve, "flag").unwrap(),
        key_image_basis(&public_key, "flag").unwrap().mult(&key).unwrap()
    );

    assert!(key_image(&BigUint::from(0u32), &curve, "").is_err());
}
