//! Addressing and OS transport for the traced process.
//!
//! The transport seam ([`RegsetOps`]) is the whole of what this subsystem
//! asks from the operating system: whole-set register transfer plus
//! word-granularity access to the per-thread debug area. The live
//! implementation speaks ptrace; tests substitute an in-memory fake, and a
//! remote-protocol target would slot in here as well.

use anyhow::Result;
use nix::unistd::Pid;

use crate::process::registers::{FPREGS_SIZE, NGREG};

/// Identifies the traced entity: a process, and optionally one of its
/// threads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InferiorId {
    pid: Pid,
    tid: Option<Pid>,
}

impl InferiorId {
    /// A single-threaded (or thread-agnostic) inferior.
    pub fn process(pid: Pid) -> Self {
        Self { pid, tid: None }
    }

    /// A specific thread of the inferior.
    pub fn thread(pid: Pid, tid: Pid) -> Self {
        Self { pid, tid: Some(tid) }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// The id ptrace calls are addressed to: the thread when we know one,
    /// the process otherwise. Every OS call resolves through here so the
    /// fallback can never drift between call sites.
    pub fn ptrace_id(&self) -> Pid {
        self.tid.unwrap_or(self.pid)
    }
}

/// The OS process-control primitive, reduced to what the register layer
/// needs. The regset calls transfer whole sets only; there is no partial
/// write, which is why stores go through read-modify-write.
pub trait RegsetOps {
    /// One "get general registers" call: the NT_PRSTATUS words in kernel
    /// buffer order.
    fn get_gregs(&self, id: Pid) -> Result<[u64; NGREG]>;

    /// One "set general registers" call with a complete buffer.
    fn set_gregs(&self, id: Pid, regs: &[u64; NGREG]) -> Result<()>;

    /// One "get floating point registers" call: the raw NT_PRFPREG bytes.
    fn get_fpregs(&self, id: Pid) -> Result<[u8; FPREGS_SIZE]>;

    /// One "set floating point registers" call with a complete buffer.
    fn set_fpregs(&self, id: Pid, regs: &[u8; FPREGS_SIZE]) -> Result<()>;

    /// Read one word at a byte offset into the per-thread user area.
    fn peek_user(&self, id: Pid, offset: usize) -> Result<u64>;

    /// Write one word at a byte offset into the per-thread user area.
    fn poke_user(&self, id: Pid, offset: usize, value: u64) -> Result<()>;
}

#[cfg(all(target_os = "linux", target_arch = "riscv64"))]
pub use self::ptrace_ops::PtraceInferior;

/// The live transport: ptrace against a stopped child we own.
#[cfg(all(target_os = "linux", target_arch = "riscv64"))]
mod ptrace_ops {
    use anyhow::Result;
    use nix::errno::Errno;
    use nix::sys::ptrace::{self, regset};
    use nix::unistd::Pid;

    use super::RegsetOps;
    use crate::process::registers::{FPREGS_SIZE, NGREG};

    pub struct PtraceInferior;

    impl RegsetOps for PtraceInferior {
        fn get_gregs(&self, id: Pid) -> Result<[u64; NGREG]> {
            let regs = ptrace::getregset::<regset::NT_PRSTATUS>(id)?;
            Ok(gregs_words(&regs))
        }

        fn set_gregs(&self, id: Pid, regs: &[u64; NGREG]) -> Result<()> {
            ptrace::setregset::<regset::NT_PRSTATUS>(id, words_gregs(regs))?;
            Ok(())
        }

        fn get_fpregs(&self, id: Pid) -> Result<[u8; FPREGS_SIZE]> {
            let mut buf = [0u8; FPREGS_SIZE];
            regset_io(libc::PTRACE_GETREGSET, id, &mut buf)?;
            Ok(buf)
        }

        fn set_fpregs(&self, id: Pid, regs: &[u8; FPREGS_SIZE]) -> Result<()> {
            let mut buf = *regs;
            regset_io(libc::PTRACE_SETREGSET, id, &mut buf)?;
            Ok(())
        }

        fn peek_user(&self, id: Pid, offset: usize) -> Result<u64> {
            let word = ptrace::read_user(id, offset as _)?;
            Ok(word as u64)
        }

        fn poke_user(&self, id: Pid, offset: usize, value: u64) -> Result<()> {
            ptrace::write_user(id, offset as _, value as _)?;
            Ok(())
        }
    }

    /// `user_regs_struct` fields in kernel buffer order: pc first, then
    /// x1..x31.
    fn gregs_words(r: &libc::user_regs_struct) -> [u64; NGREG] {
        [
            r.pc, r.ra, r.sp, r.gp, r.tp, r.t0, r.t1, r.t2, r.s0, r.s1, r.a0, r.a1, r.a2, r.a3,
            r.a4, r.a5, r.a6, r.a7, r.s2, r.s3, r.s4, r.s5, r.s6, r.s7, r.s8, r.s9, r.s10, r.s11,
            r.t3, r.t4, r.t5, r.t6,
        ]
    }

    fn words_gregs(w: &[u64; NGREG]) -> libc::user_regs_struct {
        libc::user_regs_struct {
            pc: w[0],
            ra: w[1],
            sp: w[2],
            gp: w[3],
            tp: w[4],
            t0: w[5],
            t1: w[6],
            t2: w[7],
            s0: w[8],
            s1: w[9],
            a0: w[10],
            a1: w[11],
            a2: w[12],
            a3: w[13],
            a4: w[14],
            a5: w[15],
            a6: w[16],
            a7: w[17],
            s2: w[18],
            s3: w[19],
            s4: w[20],
            s5: w[21],
            s6: w[22],
            s7: w[23],
            s8: w[24],
            s9: w[25],
            s10: w[26],
            s11: w[27],
            t3: w[28],
            t4: w[29],
            t5: w[30],
            t6: w[31],
        }
    }

    /// Raw NT_PRFPREG transfer. `nix` has no typed regset for the riscv
    /// floating point state, so this drops to the libc iovec form.
    fn regset_io(request: libc::c_uint, id: Pid, buf: &mut [u8; FPREGS_SIZE]) -> Result<()> {
        let mut iov = libc::iovec {
            iov_base: buf.as_mut_ptr().cast(),
            iov_len: buf.len(),
        };
        // SAFETY: iov describes a live, exclusively borrowed buffer.
        let rc = unsafe {
            libc::ptrace(
                request,
                id.as_raw(),
                libc::NT_PRFPREG as usize as *mut libc::c_void,
                &mut iov as *mut libc::iovec,
            )
        };
        Errno::result(rc)?;
        Ok(())
    }
}
