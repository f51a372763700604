use incase_crypto::encoding;
use incase_crypto::{
    generate_recovery_key, open_document, open_vault, seal_document, seal_vault, CryptoError,
    DataKey, EncryptedVault, KeySlot, WRAPPED_KEY_SIZE,
};

const PASSPHRASE: &str = "correct-horse-battery";

fn sealed_pair(plaintext: &[u8]) -> (EncryptedVault, String) {
    let recovery = generate_recovery_key();
    let vault = seal_vault(plaintext, PASSPHRASE, Some(&recovery)).unwrap();
    (vault, recovery)
}

fn assert_auth_failure(vault: &EncryptedVault, secret: &str) {
    assert!(matches!(
        open_vault(vault, secret),
        Err(CryptoError::AuthenticationFailed)
    ));
}

#[test]
fn passphrase_and_recovery_key_open_the_same_document() {
    let (vault, recovery) = sealed_pair(br#"{"personalNotes":{"intentions":"x"}}"#);

    let by_passphrase = open_vault(&vault, PASSPHRASE).unwrap();
    let by_recovery = open_vault(&vault, &recovery).unwrap();

    assert_eq!(by_passphrase.slot, KeySlot::Primary);
    assert_eq!(by_recovery.slot, KeySlot::Recovery);
    assert_eq!(*by_passphrase.plaintext, *by_recovery.plaintext);
    assert_eq!(
        by_passphrase.plaintext.as_slice(),
        br#"{"personalNotes":{"intentions":"x"}}"#
    );
}

#[test]
fn wrong_secret_is_rejected() {
    let (vault, recovery) = sealed_pair(b"plan");
    assert_auth_failure(&vault, "correct-horse-batter");
    assert_auth_failure(&vault, "");
    assert_auth_failure(&vault, &recovery.to_lowercase());
}

#[test]
fn flipped_ciphertext_bit_is_detected() {
    let (mut vault, _) = sealed_pair(b"plan contents");
    vault.encrypted_data[0] ^= 0x01;
    assert_auth_failure(&vault, PASSPHRASE);
}

#[test]
fn flipped_tag_bit_is_detected() {
    let (mut vault, _) = sealed_pair(b"plan contents");
    let last = vault.encrypted_data.len() - 1;
    vault.encrypted_data[last] ^= 0x80;
    assert_auth_failure(&vault, PASSPHRASE);
}

#[test]
fn flipped_data_iv_bit_is_detected() {
    let (mut vault, recovery) = sealed_pair(b"plan contents");
    vault.data_iv[11] ^= 0x01;
    assert_auth_failure(&vault, PASSPHRASE);
    assert_auth_failure(&vault, &recovery);
}

#[test]
fn flipped_primary_blob_bit_is_detected() {
    let (mut vault, _) = sealed_pair(b"plan contents");
    vault.wrapped_keys.primary.blob[10] ^= 0x04;
    assert_auth_failure(&vault, PASSPHRASE);
}

#[test]
fn flipped_primary_iv_bit_is_detected() {
    let (mut vault, _) = sealed_pair(b"plan contents");
    vault.wrapped_keys.primary.iv[0] ^= 0x01;
    assert_auth_failure(&vault, PASSPHRASE);
}

#[test]
fn flipped_recovery_blob_and_iv_bits_are_detected() {
    let (vault, recovery) = sealed_pair(b"plan contents");

    let mut blob_flipped = vault.clone();
    if let Some(slot) = blob_flipped.wrapped_keys.recovery.as_mut() {
        slot.blob[WRAPPED_KEY_SIZE - 1] ^= 0x01;
    }
    assert_auth_failure(&blob_flipped, &recovery);

    let mut iv_flipped = vault.clone();
    if let Some(slot) = iv_flipped.wrapped_keys.recovery.as_mut() {
        slot.iv[3] ^= 0x10;
    }
    assert_auth_failure(&iv_flipped, &recovery);

    // The untouched primary slot still opens.
    assert!(open_vault(&iv_flipped, PASSPHRASE).is_ok());
}

#[test]
fn resealing_identical_plaintext_changes_every_field() {
    let recovery = generate_recovery_key();
    let a = seal_vault(b"same plan", PASSPHRASE, Some(&recovery)).unwrap();
    let b = seal_vault(b"same plan", PASSPHRASE, Some(&recovery)).unwrap();

    assert_ne!(a.data_iv, b.data_iv);
    assert_ne!(a.encrypted_data, b.encrypted_data);
    assert_ne!(a.wrapped_keys.primary.salt, b.wrapped_keys.primary.salt);
    assert_ne!(a.wrapped_keys.primary.blob, b.wrapped_keys.primary.blob);
}

#[test]
fn json_uses_camel_case_and_base64() {
    let (vault, _) = sealed_pair(b"plan");
    let json = vault.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let data_iv = value["dataIv"].as_str().unwrap();
    assert_eq!(encoding::decode(data_iv).unwrap(), vault.data_iv);
    assert!(value["encryptedData"].is_string());
    for slot in ["primary", "recovery"] {
        let wrapped = &value["wrappedKeys"][slot];
        assert_eq!(encoding::decode(wrapped["salt"].as_str().unwrap()).unwrap().len(), 16);
        assert_eq!(encoding::decode(wrapped["iv"].as_str().unwrap()).unwrap().len(), 12);
        assert_eq!(encoding::decode(wrapped["blob"].as_str().unwrap()).unwrap().len(), 48);
    }
}

#[test]
fn json_roundtrip_preserves_record() {
    let (vault, recovery) = sealed_pair(b"plan");
    let restored = EncryptedVault::from_json(&vault.to_json().unwrap()).unwrap();
    assert_eq!(restored, vault);
    assert_eq!(open_vault(&restored, &recovery).unwrap().plaintext.as_slice(), b"plan");
}

#[test]
fn missing_recovery_slot_is_omitted_from_json() {
    let vault = seal_vault(b"plan", PASSPHRASE, None).unwrap();
    let json = vault.to_json().unwrap();
    assert!(!json.contains("recovery"));
    let restored = EncryptedVault::from_json(&json).unwrap();
    assert!(restored.wrapped_keys.recovery.is_none());
}

#[test]
fn wrong_length_salt_is_rejected_on_load() {
    let (vault, _) = sealed_pair(b"plan");
    let mut value: serde_json::Value = serde_json::from_str(&vault.to_json().unwrap()).unwrap();
    value["wrappedKeys"]["primary"]["salt"] = encoding::encode([0u8; 15]).into();

    let result = EncryptedVault::from_json(&value.to_string());
    assert!(matches!(result, Err(CryptoError::Serialization(_))));
}

#[test]
fn wrong_length_data_iv_is_rejected_on_load() {
    let (vault, _) = sealed_pair(b"plan");
    let mut value: serde_json::Value = serde_json::from_str(&vault.to_json().unwrap()).unwrap();
    value["dataIv"] = encoding::encode([0u8; 16]).into();

    assert!(EncryptedVault::from_json(&value.to_string()).is_err());
}

#[test]
fn wrong_length_blob_is_rejected_on_load() {
    let (vault, _) = sealed_pair(b"plan");
    let mut value: serde_json::Value = serde_json::from_str(&vault.to_json().unwrap()).unwrap();
    value["wrappedKeys"]["recovery"]["blob"] = encoding::encode([0u8; 47]).into();

    assert!(matches!(
        EncryptedVault::from_json(&value.to_string()),
        Err(CryptoError::InvalidLength { field: "blob", expected: 48, actual: 47 })
    ));
}

#[test]
fn non_base64_field_is_rejected_on_load() {
    let (vault, _) = sealed_pair(b"plan");
    let mut value: serde_json::Value = serde_json::from_str(&vault.to_json().unwrap()).unwrap();
    value["encryptedData"] = "***".into();

    assert!(EncryptedVault::from_json(&value.to_string()).is_err());
}

#[test]
fn garbage_json_is_rejected() {
    assert!(matches!(
        EncryptedVault::from_json("{\"encryptedData\": 5}"),
        Err(CryptoError::Serialization(_))
    ));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn document_seal_open_always_roundtrips(doc in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let dek = DataKey::generate();
            let sealed = seal_document(&doc, &dek).unwrap();
            prop_assert_eq!(open_document(&sealed, &dek).unwrap(), doc);
        }
    }

    proptest! {
        // Each case runs several 100,000-round derivations.
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn fuzzed_secrets_never_open(secret in "\\PC{0,40}") {
            let recovery = "ABCDE-FGHJK-LMNPQ-RSTUV";
            prop_assume!(secret != PASSPHRASE && secret != recovery);
            let vault = seal_vault(b"plan", PASSPHRASE, Some(recovery)).unwrap();
            prop_assert!(matches!(
                open_vault(&vault, &secret),
                Err(CryptoError::AuthenticationFailed)
            ));
        }
    }
}
