//! Bloch-equation generator
//!
//! Gantree: L1_Dynamics → Generator
//!
//! Builds the affine right-hand side dv/dt = J·v + b from the qubit
//! parameters and the drive:
//!
//! ```text
//! J = [[-γ₁/2-2γ₂, -ω,         0   ],
//!      [ ω,        -γ₁/2-2γ₂, -u·κ ],
//!      [ 0,         u·κ,      -γ₁  ]]
//! b = (0, 0, γ₁)
//! ```

use qest_core::{BlochVector, ControlInput, PhysicalParameters};
use serde::{Deserialize, Serialize};

/// Below this |det J| the fixed point is treated as undefined
const SINGULAR_DET: f64 = 1e-14;

/// Affine generator of the Bloch equations
/// Gantree: Generator // 생성자 행렬
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    /// J
    j: [[f64; 3]; 3],

    /// b
    b: [f64; 3],
}

impl Generator {
    /// Build J and b
    /// Gantree: new(params,control) -> Self // J, b 생성
    pub fn new(params: &PhysicalParameters, control: &ControlInput) -> Self {
        let transverse = -params.transverse_decay();
        let omega = params.omega();
        let drive = control.u() * params.kappa();
        let gamma1 = params.gamma1();

        Self {
            j: [
                [transverse, -omega, 0.0],
                [omega, transverse, -drive],
                [0.0, drive, -gamma1],
            ],
            b: [0.0, 0.0, gamma1],
        }
    }

    /// J
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        self.j
    }

    /// b
    pub fn offset(&self) -> [f64; 3] {
        self.b
    }

    /// J·v + b
    #[inline]
    pub fn rhs(&self, v: &[f64; 3]) -> [f64; 3] {
        let mut out = self.b;
        for (row, o) in self.j.iter().zip(out.iter_mut()) {
            *o += row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        }
        out
    }

    /// Steady state v* with J·v* = -b, if J is invertible
    ///
    /// Solved by Cramer's rule.
    pub fn fixed_point(&self) -> Option<BlochVector> {
        let det = det3(&self.j);
        if det.abs() < SINGULAR_DET {
            return None;
        }

        let rhs = [-self.b[0], -self.b[1], -self.b[2]];
        let mut solution = [0.0; 3];
        for (col, s) in solution.iter_mut().enumerate() {
            let mut m = self.j;
            for (row, r) in m.iter_mut().zip(rhs.iter()) {
                row[col] = *r;
            }
            *s = det3(&m) / det;
        }
        Some(BlochVector::from_array(solution))
    }
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
