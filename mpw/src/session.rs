use crate::{
    error::Error,
    templates::{class_characters, PasswordType},
};
use crypto_common::erase::{Erase, EraseOnDrop};
use hmac::Hmac;
use scrypt::{Memory, Params};

/// Algorithm namespace. Scopes derive from it, and the master-key salt
/// starts with it, so outputs are compatible with other Master Password
/// implementations fed the same identity.
pub const NAMESPACE: &[u8] = b"com.lyndir.masterpassword";

const MASTER_KEY_LEN: usize = 64;
const SCRYPT_LOG_N: u8 = 15; // N = 32768
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 2;

/// Site name used when deriving the login token.
const TOKEN_SITE: &[u8] = env!("CARGO_PKG_NAME").as_bytes();

/// Domain separator for derived outputs: the same site and counter yield
/// unrelated passwords, usernames, and recovery answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Authentication,
    Identification,
    Recovery,
    Token,
}

impl Scope {
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Authentication => NAMESPACE,
            Self::Identification => b"com.lyndir.masterpassword.login",
            Self::Recovery => b"com.lyndir.masterpassword.answer",
            Self::Token => b"com.lyndir.masterpassword.token",
        }
    }
}

struct MasterKey([u8; MASTER_KEY_LEN]);

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.erase();
    }
}

impl EraseOnDrop for MasterKey {}

impl core::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("MasterKey([redacted])")
    }
}

/// A generated token. Owns its bytes and erases them on drop; templated
/// outputs are printable ASCII, `Raw` outputs are the bare site key.
pub struct Output(Vec<u8>);

impl Output {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `None` only for `Raw` outputs that happen not to be UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        self.0.as_mut_slice().erase();
    }
}

impl EraseOnDrop for Output {}

impl core::fmt::Debug for Output {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Output([redacted])")
    }
}

/// One user session. Not for concurrent use; independent sessions are.
///
/// Holds at most a master key and the login token derived from it. Site
/// keys and outputs are ephemeral: computed per call, handed to the
/// caller, erased when dropped.
#[derive(Debug, Default)]
pub struct Mpw {
    master_key: Option<MasterKey>,
    login_token: Option<u32>,
}

impl Mpw {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            master_key: None,
            login_token: None,
        }
    }

    /// Derive the master key for an identity, replacing any prior login.
    ///
    /// The salt is `NAMESPACE ‖ be32(len(name)) ‖ name`; the key is
    /// scrypt(password, salt, N=32768, r=8, p=2, 64). `token_nonce` is a
    /// host-chosen value (a boot counter, a monotonic tick) folded into
    /// the login token so that successive logins present distinct tokens.
    /// `progress` receives percentages in [0, 100], non-decreasing.
    pub fn login(
        &mut self,
        name: &[u8],
        password: &[u8],
        token_nonce: u32,
        progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<&mut Self, Error> {
        self.login_with(name, password, token_nonce, Memory::full(), progress)
    }

    /// [`login`](Self::login) under an explicit key-derivation memory
    /// budget, for hosts that cannot spare the full 32 MiB V array.
    #[allow(clippy::cast_possible_truncation)]
    pub fn login_with<const STACK: usize>(
        &mut self,
        name: &[u8],
        password: &[u8],
        token_nonce: u32,
        memory: Memory<'_, STACK>,
        progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<&mut Self, Error> {
        self.logout();
        let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P)?;
        let mut salt = Vec::with_capacity(NAMESPACE.len() + 4 + name.len());
        salt.extend_from_slice(NAMESPACE);
        salt.extend_from_slice(&(name.len() as u32).to_be_bytes());
        salt.extend_from_slice(name);
        let mut key = [0; MASTER_KEY_LEN];
        scrypt::scrypt_with(password, &salt, &params, memory, progress, &mut key)?;
        self.master_key = Some(MasterKey(key));
        key.erase();

        let token = self.generate(TOKEN_SITE, token_nonce, PasswordType::Raw, None, Scope::Token)?;
        self.login_token = Some(u32::from_le_bytes(
            token.as_bytes()[..4].try_into().expect("raw output length"),
        ));
        Ok(self)
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.master_key.is_some()
    }

    /// Session identifier safe to hand to hosts: derived from the master
    /// key, never from object identity.
    pub fn login_token(&self) -> Result<u32, Error> {
        self.login_token.ok_or(Error::NotLoggedIn)
    }

    /// Erase the master key and all dependent state.
    pub fn logout(&mut self) {
        self.master_key = None;
        self.login_token = None;
    }

    /// Produce the site token for `(site, counter, kind, context, scope)`.
    ///
    /// The site key is HMAC-SHA-256 of
    /// `scope ‖ be32(len(site)) ‖ site ‖ be32(counter)`, extended with
    /// `be32(len(context)) ‖ context` when a context is given. `Raw`
    /// returns the site key itself; other kinds select a template by the
    /// key's first byte and one character per position from the bytes that
    /// follow. Outputs are complete or absent, never partial.
    #[allow(clippy::cast_possible_truncation)]
    pub fn generate(
        &self,
        site: &[u8],
        counter: u32,
        kind: PasswordType,
        context: Option<&[u8]>,
        scope: Scope,
    ) -> Result<Output, Error> {
        let key = self.master_key.as_ref().ok_or(Error::NotLoggedIn)?;
        let mut mac = Hmac::new_from_slice(&key.0);
        mac.update(scope.as_bytes());
        mac.update(&(site.len() as u32).to_be_bytes());
        mac.update(site);
        mac.update(&counter.to_be_bytes());
        if let Some(context) = context {
            mac.update(&(context.len() as u32).to_be_bytes());
            mac.update(context);
        }
        let mut site_key = mac.finalize_fixed();
        let result = render(kind, &site_key);
        site_key.erase();
        result
    }

    /// Derived username for a site: counter 1, `Name`, identification
    /// scope.
    pub fn username(&self, site: &[u8]) -> Result<Output, Error> {
        self.generate(site, 1, PasswordType::Name, None, Scope::Identification)
    }

    /// Derived recovery phrase for a site: counter 1, `Phrase`, recovery
    /// scope. `context` distinguishes security questions.
    pub fn recovery(&self, site: &[u8], context: Option<&[u8]>) -> Result<Output, Error> {
        self.generate(site, 1, PasswordType::Phrase, context, Scope::Recovery)
    }
}

fn render(kind: PasswordType, site_key: &[u8; 32]) -> Result<Output, Error> {
    let Some(templates) = kind.templates() else {
        return Ok(Output(site_key.to_vec()));
    };
    let template = templates[site_key[0] as usize % templates.len()];
    let mut out = Output(Vec::with_capacity(template.len()));
    for (i, &class) in template.iter().enumerate() {
        let characters = class_characters(class)?;
        // positions past 31 (gated long-phrase templates) wrap around the
        // remaining site-key bytes
        let selector = site_key[1 + i % 31];
        out.0.push(characters[selector as usize % characters.len()]);
    }
    Ok(out)
}
