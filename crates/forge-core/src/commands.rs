//! Version-scoped command blocks and the catalogs they live in

use crate::constants::NUKE_INSTALL_DIR;
use crate::os::{OperatingSystem, UpstreamImage};
use crate::version::NukeVersion;

/// An ordered group of shell statements rendered as a single `RUN`
/// directive. Statements may contain `{toolset}`, `{filename}` and
/// `{url}` placeholders, substituted at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBlock {
    shell_lines: Vec<String>,
    min_version: Option<NukeVersion>,
    max_version: Option<NukeVersion>,
}

impl CommandBlock {
    pub fn new<I, S>(shell_lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shell_lines: shell_lines.into_iter().map(Into::into).collect(),
            min_version: None,
            max_version: None,
        }
    }

    /// Lowest version (inclusive) this block applies to.
    pub fn with_min_version(mut self, version: NukeVersion) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Highest version (inclusive) this block applies to.
    pub fn with_max_version(mut self, version: NukeVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    /// Whether this block applies to the given version. Absent bounds
    /// are unbounded on that side; both bounds are inclusive.
    pub fn applies_to(&self, version: NukeVersion) -> bool {
        self.min_version.is_none_or(|min| version >= min)
            && self.max_version.is_none_or(|max| version <= max)
    }

    /// Render as a Dockerfile `RUN` directive, chaining statements.
    pub fn to_run_directive(&self) -> String {
        format!("RUN {}", self.shell_lines.join(" \\\n  && "))
    }
}

/// Ordered environment variable assignments, rendered as one `ENV`
/// directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSet {
    entries: Vec<(String, String)>,
}

impl EnvironmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply a closure to every value, replacing it with the result.
    pub fn map_values<E>(
        &self,
        mut f: impl FnMut(&str) -> std::result::Result<String, E>,
    ) -> std::result::Result<Self, E> {
        let mut mapped = Self::new();
        for (name, value) in self.iter() {
            mapped.push(name, f(value)?);
        }
        Ok(mapped)
    }

    pub fn to_env_directive(&self) -> String {
        let assignments: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("ENV {}", assignments.join(" \\\n  "))
    }
}

/// Static, ordered command collections keyed by upstream image and by
/// operating system, plus the per-OS environment sets.
///
/// Declaration order within an entry is semantically significant and is
/// preserved through version filtering. A missing key yields an empty
/// sequence; absence of image- or OS-specific setup is legal.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    image_commands: Vec<(UpstreamImage, Vec<CommandBlock>)>,
    os_commands: Vec<(OperatingSystem, Vec<CommandBlock>)>,
    os_environments: Vec<(OperatingSystem, EnvironmentSet)>,
}

impl CommandCatalog {
    pub fn empty() -> Self {
        Self {
            image_commands: Vec::new(),
            os_commands: Vec::new(),
            os_environments: Vec::new(),
        }
    }

    pub fn with_image_commands(
        mut self,
        image: UpstreamImage,
        blocks: Vec<CommandBlock>,
    ) -> Self {
        self.image_commands.push((image, blocks));
        self
    }

    pub fn with_os_commands(mut self, os: OperatingSystem, blocks: Vec<CommandBlock>) -> Self {
        self.os_commands.push((os, blocks));
        self
    }

    pub fn with_os_environment(mut self, os: OperatingSystem, env: EnvironmentSet) -> Self {
        self.os_environments.push((os, env));
        self
    }

    /// Setup blocks for an upstream image, in declaration order.
    pub fn for_image(&self, image: UpstreamImage) -> &[CommandBlock] {
        self.image_commands
            .iter()
            .find(|(key, _)| *key == image)
            .map(|(_, blocks)| blocks.as_slice())
            .unwrap_or(&[])
    }

    /// Setup blocks for an operating system, in declaration order.
    pub fn for_os(&self, os: OperatingSystem) -> &[CommandBlock] {
        self.os_commands
            .iter()
            .find(|(key, _)| *key == os)
            .map(|(_, blocks)| blocks.as_slice())
            .unwrap_or(&[])
    }

    /// Static environment set for an operating system.
    pub fn environment_for(&self, os: OperatingSystem) -> EnvironmentSet {
        self.os_environments
            .iter()
            .find(|(key, _)| *key == os)
            .map(|(_, env)| env.clone())
            .unwrap_or_default()
    }
}

/// The shipped catalog: everything needed to set up compilers, build
/// tooling and the Nuke installation on each supported target.
impl Default for CommandCatalog {
    fn default() -> Self {
        Self::empty()
            .with_image_commands(
                UpstreamImage::RockyLinux8,
                vec![CommandBlock::new([
                    "dnf install gcc-toolset-{toolset}-gcc gcc-toolset-{toolset}-gcc-c++ -y",
                    "dnf install cmake3 git -y",
                    "dnf install mesa-libGLU-devel -y",
                    "ln -s /opt/rh/gcc-toolset-{toolset}/root/bin/gcc /usr/bin/gcc",
                    "ln -s /opt/rh/gcc-toolset-{toolset}/root/bin/g++ /usr/bin/g++",
                    "dnf clean all",
                    "rm -rf /var/cache/dnf",
                ])],
            )
            .with_image_commands(
                UpstreamImage::Manylinux2014,
                vec![CommandBlock::new([
                    "yum install {toolset} -y",
                    "yum install cmake3 git -y",
                    "yum install mesa-libGLU-devel -y",
                    "yum clean all",
                    "rm -rf /var/cache/yum",
                ])],
            )
            .with_os_commands(
                OperatingSystem::Linux,
                vec![CommandBlock::new([
                    "curl -o /tmp/{filename}.tgz {url}".to_string(),
                    "tar zxvf /tmp/{filename}.tgz -C /tmp".to_string(),
                    format!("mkdir -p {NUKE_INSTALL_DIR}"),
                    format!(
                        "/tmp/{{filename}}.run --accept-foundry-eula \
                         --prefix={NUKE_INSTALL_DIR} --exclude-subdir"
                    ),
                    "rm -rf /tmp/{filename}*".to_string(),
                ])],
            )
            .with_os_commands(
                OperatingSystem::Windows,
                vec![
                    CommandBlock::new([
                        "apt-get update",
                        "apt-get install wine64 python3 msitools ca-certificates git curl \
                         ninja-build winbind -y",
                        "apt-get clean -y",
                        "rm -rf /var/lib/apt/lists/*",
                        "curl -LO https://github.com/Kitware/CMake/releases/download/v3.29.3\
                         /cmake-3.29.3-linux-x86_64.sh",
                        "chmod +x cmake-3.29.3-linux-x86_64.sh",
                        "./cmake-3.29.3-linux-x86_64.sh --prefix=/usr/local --skip-license",
                        "rm cmake-3.29.3-linux-x86_64.sh",
                    ]),
                    CommandBlock::new([
                        "$(command -v wine64 || command -v wine || false) wineboot --init",
                        "while pgrep wineserver > /dev/null; do sleep 1; done",
                    ]),
                    CommandBlock::new([
                        "cd ~/",
                        "git clone https://github.com/mstorsjo/msvc-wine.git",
                        "cd msvc-wine",
                        "git checkout 44dc13b5e62ecc2373fbe7e4727a525001f403f4",
                        "PYTHONUNBUFFERED=1 ./vsdownload.py --major {toolset} \
                         --accept-license --dest /opt/msvc",
                        "./install.sh /opt/msvc",
                        "mv ./msvcenv-native.sh /opt/msvc",
                        "cd ../ && rm -rf ./msvc-wine",
                        "bash -c 'export BIN=/opt/msvc/bin/x64/",
                        ". /opt/msvc/msvcenv-native.sh",
                        "MSVCDIR=$(. \"${BIN}msvcenv.sh\" && echo $MSVCDIR)",
                        r"MSVCDIR=${MSVCDIR//\\//}",
                        "MSVCDIR=${MSVCDIR#z:}",
                        "echo \"export BIN=${BIN}\" >> /etc/bashrc",
                        "echo \"export MSVCDIR=$MSVCDIR\" >> /etc/bashrc",
                        "echo \"export CC=${BIN}cl\" >> /etc/bashrc",
                        "echo \"export CXX=${BIN}cl\" >> /etc/bashrc",
                        "echo \"export RC=${BIN}rc\" >> /etc/bashrc",
                        "echo \"source /opt/msvc/msvcenv-native.sh\" >> /etc/bashrc'",
                    ]),
                ],
            )
            .with_os_commands(
                OperatingSystem::MacOs,
                macos_command_blocks(),
            )
            .with_os_commands(
                OperatingSystem::MacOsArm,
                macos_command_blocks(),
            )
            .with_os_environment(OperatingSystem::Linux, {
                let mut env = EnvironmentSet::new();
                env.push("CMAKE_PREFIX_PATH", NUKE_INSTALL_DIR);
                env.push("CXXFLAGS", "-std=c++{cpp_version}");
                env
            })
            .with_os_environment(OperatingSystem::Windows, {
                let mut env = EnvironmentSet::new();
                env.push("CMAKE_PREFIX_PATH", NUKE_INSTALL_DIR);
                env.push("PATH", "/opt/msvc/bin/x64:$PATH");
                env.push("GLOBAL_TOOLCHAIN", "/nukeforge/toolchain.cmake");
                env
            })
            .with_os_environment(OperatingSystem::MacOs, macos_environment())
            .with_os_environment(OperatingSystem::MacOsArm, macos_environment())
    }
}

/// osxcross bootstrap; `{toolset}` is the macOS SDK archive URL for the
/// targeted major version.
fn macos_command_blocks() -> Vec<CommandBlock> {
    vec![
        CommandBlock::new([
            "apt-get update",
            "apt-get install clang cmake git curl patch python3 libssl-dev liblzma-dev \
             libxml2-dev xz-utils bzip2 cpio zlib1g-dev -y",
            "apt-get clean -y",
            "rm -rf /var/lib/apt/lists/*",
        ]),
        CommandBlock::new([
            "git clone https://github.com/tpoechtrager/osxcross.git /opt/osxcross-src",
            "cd /opt/osxcross-src",
            "curl -Lo tarballs/$(basename {toolset}) {toolset}",
            "UNATTENDED=1 TARGET_DIR=/opt/osxcross ./build.sh",
            "rm -rf /opt/osxcross-src",
        ]),
    ]
}

fn macos_environment() -> EnvironmentSet {
    let mut env = EnvironmentSet::new();
    env.push("CMAKE_PREFIX_PATH", NUKE_INSTALL_DIR);
    env.push("PATH", "/opt/osxcross/bin:$PATH");
    env
}
